use crate::error::SoundFontError;
use crate::generator_type::GeneratorType;
use crate::loop_mode::LoopMode;
use crate::sample_header::SampleHeader;
use crate::soundfont_math::SoundFontMath;
use crate::zone::Zone;

/// One instrument zone: a key/velocity range paired with the sample it
/// plays and the generator amounts (envelope times, filter cutoff, loop
/// overrides, ...) that zone contributes, with SF2's defaults for anything
/// neither the zone nor its instrument's global zone mentions.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct InstrumentRegion {
    pub(crate) sample: SampleHeader,
    gs: [i16; GeneratorType::COUNT],
}

impl InstrumentRegion {
    fn defaults() -> [i16; GeneratorType::COUNT] {
        let mut gs = [0_i16; GeneratorType::COUNT];
        gs[GeneratorType::InitialFilterCutoffFrequency as usize] = 13500;
        gs[GeneratorType::DelayModulationLfo as usize] = -12000;
        gs[GeneratorType::DelayVibratoLfo as usize] = -12000;
        gs[GeneratorType::DelayModulationEnvelope as usize] = -12000;
        gs[GeneratorType::AttackModulationEnvelope as usize] = -12000;
        gs[GeneratorType::HoldModulationEnvelope as usize] = -12000;
        gs[GeneratorType::DecayModulationEnvelope as usize] = -12000;
        gs[GeneratorType::ReleaseModulationEnvelope as usize] = -12000;
        gs[GeneratorType::DelayVolumeEnvelope as usize] = -12000;
        gs[GeneratorType::AttackVolumeEnvelope as usize] = -12000;
        gs[GeneratorType::HoldVolumeEnvelope as usize] = -12000;
        gs[GeneratorType::DecayVolumeEnvelope as usize] = -12000;
        gs[GeneratorType::ReleaseVolumeEnvelope as usize] = -12000;
        gs[GeneratorType::KeyRange as usize] = 0x7F00_u16 as i16;
        gs[GeneratorType::VelocityRange as usize] = 0x7F00_u16 as i16;
        gs[GeneratorType::KeyNum as usize] = -1;
        gs[GeneratorType::Velocity as usize] = -1;
        gs[GeneratorType::ScaleTuning as usize] = 100;
        gs[GeneratorType::OverridingRootKey as usize] = -1;
        gs
    }

    fn new(
        instrument_id: usize,
        global_zone: &Zone,
        local_zone: &Zone,
        samples: &[SampleHeader],
    ) -> Result<Self, SoundFontError> {
        let mut gs = Self::defaults();
        global_zone.apply(&mut gs);
        local_zone.apply(&mut gs);

        let id = gs[GeneratorType::SampleId as usize] as i32;
        let sample = if id >= 0 {
            samples.get(id as usize).cloned()
        } else {
            None
        };
        let sample = sample.ok_or(SoundFontError::InvalidSampleId {
            instrument_id,
            sample_id: id.max(0) as usize,
        })?;
        Ok(Self { sample, gs })
    }

    /// Builds every region belonging to one `inst` record's zone span.
    /// Follows the SF2 global-zone convention: if the first zone in the
    /// span is global (doesn't end in a `sampleID` generator), it supplies
    /// defaults for every other zone instead of becoming a region itself.
    pub(crate) fn create(
        instrument_id: usize,
        zones: &[Zone],
        samples: &[SampleHeader],
    ) -> Result<Vec<Self>, SoundFontError> {
        if zones.is_empty() {
            return Err(SoundFontError::InvalidInstrument(instrument_id));
        }

        let has_global = Zone::has_global(zones, GeneratorType::SampleId as u16);
        let empty = Zone::empty();

        if has_global {
            let global = &zones[0];
            zones[1..]
                .iter()
                .map(|zone| Self::new(instrument_id, global, zone, samples))
                .collect()
        } else {
            zones
                .iter()
                .map(|zone| Self::new(instrument_id, &empty, zone, samples))
                .collect()
        }
    }

    pub(crate) fn contains(&self, key: i32, velocity: i32) -> bool {
        let (key_lo, key_hi) = self.key_range();
        let (vel_lo, vel_hi) = self.velocity_range();
        (key_lo..=key_hi).contains(&key) && (vel_lo..=vel_hi).contains(&velocity)
    }

    fn gv(&self, generator_type: GeneratorType) -> i32 {
        self.gs[generator_type as usize] as i32
    }

    pub(crate) fn sample_start(&self) -> i32 {
        self.sample.start + self.start_address_offset()
    }

    pub(crate) fn sample_end(&self) -> i32 {
        self.sample.end + self.end_address_offset()
    }

    pub(crate) fn sample_start_loop(&self) -> i32 {
        self.sample.start_loop + self.start_loop_address_offset()
    }

    pub(crate) fn sample_end_loop(&self) -> i32 {
        self.sample.end_loop + self.end_loop_address_offset()
    }

    fn start_address_offset(&self) -> i32 {
        32768 * self.gv(GeneratorType::StartAddrsCoarseOffset) + self.gv(GeneratorType::StartAddrsOffset)
    }

    fn end_address_offset(&self) -> i32 {
        32768 * self.gv(GeneratorType::EndAddrsCoarseOffset) + self.gv(GeneratorType::EndAddrsOffset)
    }

    fn start_loop_address_offset(&self) -> i32 {
        32768 * self.gv(GeneratorType::StartloopAddrsCoarseOffset)
            + self.gv(GeneratorType::StartloopAddrsOffset)
    }

    fn end_loop_address_offset(&self) -> i32 {
        32768 * self.gv(GeneratorType::EndloopAddrsCoarseOffset)
            + self.gv(GeneratorType::EndloopAddrsOffset)
    }

    pub(crate) fn key_range(&self) -> (i32, i32) {
        let raw = self.gs[GeneratorType::KeyRange as usize] as u16;
        ((raw & 0xFF) as i32, ((raw >> 8) & 0xFF) as i32)
    }

    pub(crate) fn velocity_range(&self) -> (i32, i32) {
        let raw = self.gs[GeneratorType::VelocityRange as usize] as u16;
        ((raw & 0xFF) as i32, ((raw >> 8) & 0xFF) as i32)
    }

    pub(crate) fn sample_modes(&self) -> LoopMode {
        LoopMode::from_raw(self.gs[GeneratorType::SampleModes as usize])
    }

    pub(crate) fn exclusive_class(&self) -> i32 {
        self.gv(GeneratorType::ExclusiveClass)
    }

    pub(crate) fn root_key(&self) -> i32 {
        let overriding = self.gv(GeneratorType::OverridingRootKey);
        if overriding != -1 {
            overriding
        } else {
            self.sample.original_pitch as i32
        }
    }

    pub(crate) fn coarse_tune(&self) -> i32 {
        self.gv(GeneratorType::CoarseTune)
    }

    pub(crate) fn fine_tune(&self) -> i32 {
        self.gv(GeneratorType::FineTune) + self.sample.pitch_correction as i32
    }

    pub(crate) fn scale_tuning(&self) -> i32 {
        self.gv(GeneratorType::ScaleTuning)
    }

    pub(crate) fn pan(&self) -> f32 {
        0.1 * self.gv(GeneratorType::Pan) as f32
    }

    pub(crate) fn initial_attenuation(&self) -> f32 {
        0.1 * self.gv(GeneratorType::InitialAttenuation) as f32
    }

    pub(crate) fn initial_filter_cutoff_frequency(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gv(GeneratorType::InitialFilterCutoffFrequency) as f32)
    }

    pub(crate) fn initial_filter_q(&self) -> f32 {
        0.1 * self.gv(GeneratorType::InitialFilterQ) as f32
    }

    pub(crate) fn modulation_lfo_to_pitch(&self) -> i32 {
        self.gv(GeneratorType::ModulationLfoToPitch)
    }

    pub(crate) fn vibrato_lfo_to_pitch(&self) -> i32 {
        self.gv(GeneratorType::VibratoLfoToPitch)
    }

    pub(crate) fn modulation_envelope_to_pitch(&self) -> i32 {
        self.gv(GeneratorType::ModulationEnvelopeToPitch)
    }

    pub(crate) fn modulation_lfo_to_filter_cutoff_frequency(&self) -> i32 {
        self.gv(GeneratorType::ModulationLfoToFilterCutoffFrequency)
    }

    pub(crate) fn modulation_envelope_to_filter_cutoff_frequency(&self) -> i32 {
        self.gv(GeneratorType::ModulationEnvelopeToFilterCutoffFrequency)
    }

    pub(crate) fn modulation_lfo_to_volume(&self) -> f32 {
        0.1 * self.gv(GeneratorType::ModulationLfoToVolume) as f32
    }

    pub(crate) fn chorus_effects_send(&self) -> f32 {
        0.1 * self.gv(GeneratorType::ChorusEffectsSend) as f32
    }

    pub(crate) fn reverb_effects_send(&self) -> f32 {
        0.1 * self.gv(GeneratorType::ReverbEffectsSend) as f32
    }

    pub(crate) fn delay_modulation_lfo(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DelayModulationLfo) as f32)
    }

    pub(crate) fn frequency_modulation_lfo(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gv(GeneratorType::FrequencyModulationLfo) as f32)
    }

    pub(crate) fn delay_vibrato_lfo(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DelayVibratoLfo) as f32)
    }

    pub(crate) fn frequency_vibrato_lfo(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gv(GeneratorType::FrequencyVibratoLfo) as f32)
    }

    pub(crate) fn delay_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DelayModulationEnvelope) as f32)
    }

    pub(crate) fn attack_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::AttackModulationEnvelope) as f32)
    }

    pub(crate) fn hold_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::HoldModulationEnvelope) as f32)
    }

    pub(crate) fn decay_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DecayModulationEnvelope) as f32)
    }

    pub(crate) fn sustain_modulation_envelope(&self) -> f32 {
        0.1 * self.gv(GeneratorType::SustainModulationEnvelope) as f32
    }

    pub(crate) fn release_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::ReleaseModulationEnvelope) as f32)
    }

    pub(crate) fn key_number_to_modulation_envelope_hold(&self) -> i32 {
        self.gv(GeneratorType::KeyNumberToModulationEnvelopeHold)
    }

    pub(crate) fn key_number_to_modulation_envelope_decay(&self) -> i32 {
        self.gv(GeneratorType::KeyNumberToModulationEnvelopeDecay)
    }

    pub(crate) fn delay_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DelayVolumeEnvelope) as f32)
    }

    pub(crate) fn attack_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::AttackVolumeEnvelope) as f32)
    }

    pub(crate) fn hold_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::HoldVolumeEnvelope) as f32)
    }

    pub(crate) fn decay_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::DecayVolumeEnvelope) as f32)
    }

    pub(crate) fn sustain_volume_envelope(&self) -> f32 {
        0.1 * self.gv(GeneratorType::SustainVolumeEnvelope) as f32
    }

    pub(crate) fn release_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gv(GeneratorType::ReleaseVolumeEnvelope) as f32)
    }

    pub(crate) fn key_number_to_volume_envelope_hold(&self) -> i32 {
        self.gv(GeneratorType::KeyNumberToVolumeEnvelopeHold)
    }

    pub(crate) fn key_number_to_volume_envelope_decay(&self) -> i32 {
        self.gv(GeneratorType::KeyNumberToVolumeEnvelopeDecay)
    }

    pub(crate) fn gs_value(&self, generator_type: GeneratorType) -> i32 {
        self.gv(generator_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::sample_header::SampleType;

    fn sample() -> SampleHeader {
        SampleHeader {
            name: "test".into(),
            start: 0,
            end: 1000,
            start_loop: 100,
            end_loop: 900,
            sample_rate: 44100,
            original_pitch: 60,
            pitch_correction: 0,
            link: 0,
            sample_type: SampleType::Mono,
        }
    }

    #[test]
    fn defaults_give_unit_key_range_and_scale_tuning() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::SampleId as u16,
                value: 0,
            }],
        };
        let region =
            InstrumentRegion::new(0, &Zone::empty(), &zone, std::slice::from_ref(&sample()))
                .unwrap();
        assert_eq!(region.key_range(), (0, 127));
        assert_eq!(region.scale_tuning(), 100);
        assert_eq!(region.root_key(), 60);
    }

    #[test]
    fn global_zone_supplies_defaults_to_local_zones() {
        let global = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::Pan as u16,
                value: 500,
            }],
        };
        let local = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::SampleId as u16,
                value: 0,
            }],
        };
        let zones = vec![global, local];
        let regions = InstrumentRegion::create(0, &zones, &[sample()]).unwrap();
        assert_eq!(regions.len(), 1);
        assert!((regions[0].pan() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_sample_id_is_rejected() {
        let zone = Zone {
            generators: vec![Generator {
                generator_type: GeneratorType::SampleId as u16,
                value: 5,
            }],
        };
        let result = InstrumentRegion::create(0, std::slice::from_ref(&zone), &[sample()]);
        assert!(result.is_err());
    }
}
