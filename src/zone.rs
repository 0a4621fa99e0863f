use std::io;

use crate::error::SoundFontError;
use crate::generator::Generator;
use crate::generator_type::GeneratorType;

/// A single preset or instrument zone: the generator list covering a key/
/// velocity range (or, for a global zone, the defaults every other zone in
/// the same preset/instrument inherits). Bag + generator parsing is
/// identical for `pbag`/`pgen` and `ibag`/`igen`, so both preset and
/// instrument loading share this.
#[derive(Debug, Clone, Default)]
pub(crate) struct Zone {
    pub(crate) generators: Vec<Generator>,
}

impl Zone {
    /// Splits a bag-index array plus the generator pool it indexes into into
    /// one `Zone` per bag-to-bag span. `bag_indexes` must have at least two
    /// entries (N zones need N+1 terminating indices, per the `pbag`/`ibag`
    /// layout); each span's generator slice runs up to but excluding any
    /// trailing `EndOper` sentinel.
    pub(crate) fn create(
        bag_indexes: &[u16],
        generators: &[Generator],
    ) -> Result<Vec<Self>, SoundFontError> {
        if bag_indexes.len() <= 1 {
            return Ok(Vec::new());
        }

        let mut zones = Vec::with_capacity(bag_indexes.len() - 1);
        for window in bag_indexes.windows(2) {
            let start = window[0] as usize;
            let end = window[1] as usize;
            if end < start || end > generators.len() {
                return Err(SoundFontError::InvalidZoneBagRange { start, end });
            }
            let mut slice = generators[start..end].to_vec();
            if let Some(last) = slice.last() {
                if last.generator_type == GeneratorType::EndOper as u16 {
                    slice.pop();
                }
            }
            zones.push(Zone { generators: slice });
        }
        Ok(zones)
    }

    /// True if `zones[0]` is the implicit global zone: present whenever the
    /// first zone's generator list does not end with the generator that
    /// terminates a real (non-global) zone of this kind (`Instrument` for
    /// preset zones, `SampleId` for instrument zones).
    pub(crate) fn has_global(zones: &[Zone], terminal_generator_type: u16) -> bool {
        match zones.first() {
            Some(zone) => match zone.generators.last() {
                Some(last) => last.generator_type != terminal_generator_type,
                None => true,
            },
            None => false,
        }
    }

    pub(crate) fn generator(&self, generator_type: u16) -> Option<&Generator> {
        self.generators
            .iter()
            .find(|g| g.generator_type == generator_type)
    }

    /// Applies this zone's generators onto a 61-slot generator-amount array,
    /// in the order SF2 zones are walked: later values for the same
    /// generator type overwrite earlier ones, and unknown generator indices
    /// are silently ignored.
    pub(crate) fn apply(&self, gs: &mut [i16; GeneratorType::COUNT]) {
        for generator in &self.generators {
            let index = generator.generator_type as usize;
            if index < gs.len() {
                gs[index] = generator.value;
            }
        }
    }

    pub(crate) fn empty() -> Self {
        Zone {
            generators: Vec::new(),
        }
    }
}

pub(crate) fn invalid_data(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen(t: u16, v: i16) -> Generator {
        Generator {
            generator_type: t,
            value: v,
        }
    }

    #[test]
    fn splits_bag_indexes_into_zones() {
        let generators = vec![gen(43, 0), gen(41, 5), gen(17, 0)];
        let bag_indexes = [0_u16, 1, 3];
        let zones = Zone::create(&bag_indexes, &generators).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].generators.len(), 1);
        assert_eq!(zones[1].generators.len(), 2);
    }

    #[test]
    fn detects_global_zone_by_missing_terminal_generator() {
        let generators = vec![gen(17, 0), gen(41, 2)];
        let bag_indexes = [0_u16, 1, 2];
        let zones = Zone::create(&bag_indexes, &generators).unwrap();
        assert!(Zone::has_global(&zones, GeneratorType::Instrument as u16));
    }

    #[test]
    fn no_global_zone_when_first_zone_terminates_properly() {
        let generators = vec![gen(41, 2)];
        let bag_indexes = [0_u16, 1];
        let zones = Zone::create(&bag_indexes, &generators).unwrap();
        assert!(!Zone::has_global(&zones, GeneratorType::Instrument as u16));
    }
}
