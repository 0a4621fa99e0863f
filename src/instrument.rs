use crate::error::SoundFontError;
use crate::instrument_region::InstrumentRegion;
use crate::sample_header::SampleHeader;
use crate::zone::Zone;

/// One `inst` record: a name plus the regions built from its zone span.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Instrument {
    pub name: String,
    pub regions: Vec<InstrumentRegion>,
}

impl Instrument {
    /// `infos` is the raw, unsplit `inst` record array (name + zone-start
    /// index, with the zone-end index already back-filled by the caller);
    /// the trailing terminator record is dropped here as it names no zones
    /// of its own.
    pub(crate) fn create(
        infos: &[InstrumentInfo],
        zones: &[Zone],
        samples: &[SampleHeader],
    ) -> Result<Vec<Self>, SoundFontError> {
        if infos.len() <= 1 {
            return Err(SoundFontError::InstrumentNotFound);
        }

        let count = infos.len() - 1;
        let mut instruments = Vec::with_capacity(count);
        for (id, info) in infos.iter().take(count).enumerate() {
            let zone_count = info.zone_end_index - info.zone_start_index + 1;
            if zone_count <= 0 {
                return Err(SoundFontError::InvalidInstrument(id));
            }
            let start = info.zone_start_index as usize;
            let span = &zones[start..start + zone_count as usize];
            let regions = InstrumentRegion::create(id, span, samples)?;
            instruments.push(Instrument {
                name: info.name.clone(),
                regions,
            });
        }
        Ok(instruments)
    }
}

/// A raw `inst` record: name plus the index into `ibag` where this
/// instrument's zones begin. The end index is derived from the next
/// record's start index once the full array has been read.
#[derive(Debug, Clone)]
pub(crate) struct InstrumentInfo {
    pub(crate) name: String,
    pub(crate) zone_start_index: i32,
    pub(crate) zone_end_index: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::generator_type::GeneratorType;
    use crate::sample_header::SampleType;

    fn sample() -> SampleHeader {
        SampleHeader {
            name: "s".into(),
            start: 0,
            end: 10,
            start_loop: 1,
            end_loop: 9,
            sample_rate: 44100,
            original_pitch: 60,
            pitch_correction: 0,
            link: 0,
            sample_type: SampleType::Mono,
        }
    }

    #[test]
    fn builds_instruments_from_zone_spans() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::SampleId as u16,
                value: 0,
            }],
        };
        let infos = vec![
            InstrumentInfo {
                name: "Piano".into(),
                zone_start_index: 0,
                zone_end_index: 0,
            },
            InstrumentInfo {
                name: "".into(),
                zone_start_index: 1,
                zone_end_index: 0,
            },
        ];
        let instruments = Instrument::create(&infos, std::slice::from_ref(&zone), &[sample()]).unwrap();
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments[0].name, "Piano");
        assert_eq!(instruments[0].regions.len(), 1);
    }
}
