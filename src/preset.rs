use crate::error::SoundFontError;
use crate::instrument::Instrument;
use crate::preset_region::PresetRegion;
use crate::zone::Zone;

/// One `phdr` record: the name and bank/patch addressing a MIDI program
/// change selects, plus the regions built from its zone span.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Preset {
    pub name: String,
    pub patch_number: i32,
    pub bank_number: i32,
    pub library: i32,
    pub genre: i32,
    pub morphology: i32,
    pub regions: Vec<PresetRegion>,
}

impl Preset {
    pub(crate) fn create(
        infos: &[PresetInfo],
        zones: &[Zone],
        instrument_count: usize,
    ) -> Result<Vec<Self>, SoundFontError> {
        if infos.len() <= 1 {
            return Err(SoundFontError::PresetNotFound);
        }

        let count = infos.len() - 1;
        let mut presets = Vec::with_capacity(count);
        for (id, info) in infos.iter().take(count).enumerate() {
            let zone_count = info.zone_end_index - info.zone_start_index + 1;
            if zone_count <= 0 {
                return Err(SoundFontError::InvalidPreset(id));
            }
            let start = info.zone_start_index as usize;
            let span = &zones[start..start + zone_count as usize];
            let regions = PresetRegion::create(id, span, instrument_count)?;
            presets.push(Preset {
                name: info.name.clone(),
                patch_number: info.patch_number,
                bank_number: info.bank_number,
                library: info.library,
                genre: info.genre,
                morphology: info.morphology,
                regions,
            });
        }
        Ok(presets)
    }

    pub(crate) fn find_region(&self, key: i32, velocity: i32) -> Option<&PresetRegion> {
        self.regions.iter().find(|r| r.contains(key, velocity))
    }
}

/// A raw `phdr` record: name, patch/bank addressing, and the index into
/// `pbag` where this preset's zones begin.
#[derive(Debug, Clone)]
pub(crate) struct PresetInfo {
    pub(crate) name: String,
    pub(crate) patch_number: i32,
    pub(crate) bank_number: i32,
    pub(crate) zone_start_index: i32,
    pub(crate) zone_end_index: i32,
    pub(crate) library: i32,
    pub(crate) genre: i32,
    pub(crate) morphology: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::generator_type::GeneratorType;

    #[test]
    fn builds_presets_and_finds_region_by_key_velocity() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::Instrument as u16,
                value: 0,
            }],
        };
        let infos = vec![
            PresetInfo {
                name: "Grand Piano".into(),
                patch_number: 0,
                bank_number: 0,
                zone_start_index: 0,
                zone_end_index: 0,
                library: 0,
                genre: 0,
                morphology: 0,
            },
            PresetInfo {
                name: "".into(),
                patch_number: 0,
                bank_number: 0,
                zone_start_index: 1,
                zone_end_index: 0,
                library: 0,
                genre: 0,
                morphology: 0,
            },
        ];
        let presets = Preset::create(&infos, std::slice::from_ref(&zone), 1).unwrap();
        assert_eq!(presets.len(), 1);
        assert!(presets[0].find_region(60, 100).is_some());
    }
}
