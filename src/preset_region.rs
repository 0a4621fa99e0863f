use crate::error::SoundFontError;
use crate::generator_type::GeneratorType;
use crate::instrument::Instrument;
use crate::zone::Zone;

/// One preset zone: a key/velocity range paired with the instrument it
/// selects, plus whatever generator amounts it overrides on top of that
/// instrument's own (the two are summed per generator at voice start).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PresetRegion {
    pub(crate) instrument_index: usize,
    gs: [i16; GeneratorType::COUNT],
}

impl PresetRegion {
    fn defaults() -> [i16; GeneratorType::COUNT] {
        let mut gs = [0_i16; GeneratorType::COUNT];
        gs[GeneratorType::KeyRange as usize] = 0x7F00_u16 as i16;
        gs[GeneratorType::VelocityRange as usize] = 0x7F00_u16 as i16;
        gs
    }

    fn new(
        preset_id: usize,
        global_zone: &Zone,
        local_zone: &Zone,
        instrument_count: usize,
    ) -> Result<Self, SoundFontError> {
        let mut gs = Self::defaults();
        global_zone.apply(&mut gs);
        local_zone.apply(&mut gs);

        let id = gs[GeneratorType::Instrument as usize] as i32;
        if id < 0 || id as usize >= instrument_count {
            return Err(SoundFontError::InvalidInstrumentId {
                preset_id,
                instrument_id: id.max(0) as usize,
            });
        }

        Ok(Self {
            instrument_index: id as usize,
            gs,
        })
    }

    pub(crate) fn create(
        preset_id: usize,
        zones: &[Zone],
        instrument_count: usize,
    ) -> Result<Vec<Self>, SoundFontError> {
        if zones.is_empty() {
            return Err(SoundFontError::InvalidPreset(preset_id));
        }

        let has_global = Zone::has_global(zones, GeneratorType::Instrument as u16);
        let empty = Zone::empty();

        if has_global {
            let global = &zones[0];
            zones[1..]
                .iter()
                .map(|zone| Self::new(preset_id, global, zone, instrument_count))
                .collect()
        } else {
            zones
                .iter()
                .map(|zone| Self::new(preset_id, &empty, zone, instrument_count))
                .collect()
        }
    }

    pub(crate) fn contains(&self, key: i32, velocity: i32) -> bool {
        let (key_lo, key_hi) = self.key_range();
        let (vel_lo, vel_hi) = self.velocity_range();
        (key_lo..=key_hi).contains(&key) && (vel_lo..=vel_hi).contains(&velocity)
    }

    pub(crate) fn key_range(&self) -> (i32, i32) {
        let raw = self.gs[GeneratorType::KeyRange as usize] as u16;
        ((raw & 0xFF) as i32, ((raw >> 8) & 0xFF) as i32)
    }

    pub(crate) fn velocity_range(&self) -> (i32, i32) {
        let raw = self.gs[GeneratorType::VelocityRange as usize] as u16;
        ((raw & 0xFF) as i32, ((raw >> 8) & 0xFF) as i32)
    }

    pub(crate) fn instrument<'a>(&self, instruments: &'a [Instrument]) -> &'a Instrument {
        &instruments[self.instrument_index]
    }

    pub(crate) fn gs_value(&self, generator_type: GeneratorType) -> i32 {
        self.gs[generator_type as usize] as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn defaults_give_full_key_and_velocity_range() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::Instrument as u16,
                value: 0,
            }],
        };
        let region = PresetRegion::new(0, &Zone::empty(), &zone, 1).unwrap();
        assert_eq!(region.key_range(), (0, 127));
        assert_eq!(region.velocity_range(), (0, 127));
    }

    #[test]
    fn invalid_instrument_id_is_rejected() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::Instrument as u16,
                value: 3,
            }],
        };
        let result = PresetRegion::create(0, std::slice::from_ref(&zone), 1);
        assert!(result.is_err());
    }
}
