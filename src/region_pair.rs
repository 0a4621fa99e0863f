use crate::generator_type::GeneratorType;
use crate::instrument_region::InstrumentRegion;
use crate::loop_mode::LoopMode;
use crate::preset_region::PresetRegion;
use crate::sample_header::SampleHeader;
use crate::soundfont_math::SoundFontMath;

/// The region a playing voice actually reads from: a preset region and the
/// instrument region it points to, combined generator-by-generator. SF2
/// additively combines the two layers — a preset region's value for a
/// generator is added to the instrument region's value for the same
/// generator, not substituted for it.
pub(crate) struct RegionPair<'a> {
    preset: &'a PresetRegion,
    instrument: &'a InstrumentRegion,
}

impl<'a> RegionPair<'a> {
    pub(crate) fn new(preset: &'a PresetRegion, instrument: &'a InstrumentRegion) -> Self {
        Self { preset, instrument }
    }

    fn gs(&self, generator_type: GeneratorType) -> i32 {
        self.preset.gs_value(generator_type) + self.instrument.gs_value(generator_type)
    }

    pub(crate) fn sample(&self) -> &SampleHeader {
        &self.instrument.sample
    }

    pub(crate) fn sample_sample_rate(&self) -> i32 {
        self.instrument.sample.sample_rate
    }

    pub(crate) fn sample_start(&self) -> i32 {
        self.instrument.sample_start()
    }

    pub(crate) fn sample_end(&self) -> i32 {
        self.instrument.sample_end()
    }

    pub(crate) fn sample_start_loop(&self) -> i32 {
        self.instrument.sample_start_loop()
    }

    pub(crate) fn sample_end_loop(&self) -> i32 {
        self.instrument.sample_end_loop()
    }

    pub(crate) fn modulation_lfo_to_pitch(&self) -> i32 {
        self.gs(GeneratorType::ModulationLfoToPitch)
    }

    pub(crate) fn vibrato_lfo_to_pitch(&self) -> i32 {
        self.gs(GeneratorType::VibratoLfoToPitch)
    }

    pub(crate) fn modulation_envelope_to_pitch(&self) -> i32 {
        self.gs(GeneratorType::ModulationEnvelopeToPitch)
    }

    pub(crate) fn initial_filter_cutoff_frequency(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gs(GeneratorType::InitialFilterCutoffFrequency) as f32)
    }

    pub(crate) fn initial_filter_q(&self) -> f32 {
        0.1 * self.gs(GeneratorType::InitialFilterQ) as f32
    }

    pub(crate) fn modulation_lfo_to_filter_cutoff_frequency(&self) -> i32 {
        self.gs(GeneratorType::ModulationLfoToFilterCutoffFrequency)
    }

    pub(crate) fn modulation_envelope_to_filter_cutoff_frequency(&self) -> i32 {
        self.gs(GeneratorType::ModulationEnvelopeToFilterCutoffFrequency)
    }

    pub(crate) fn modulation_lfo_to_volume(&self) -> f32 {
        0.1 * self.gs(GeneratorType::ModulationLfoToVolume) as f32
    }

    pub(crate) fn chorus_effects_send(&self) -> f32 {
        0.1 * self.gs(GeneratorType::ChorusEffectsSend) as f32
    }

    pub(crate) fn reverb_effects_send(&self) -> f32 {
        0.1 * self.gs(GeneratorType::ReverbEffectsSend) as f32
    }

    pub(crate) fn pan(&self) -> f32 {
        0.1 * self.gs(GeneratorType::Pan) as f32
    }

    pub(crate) fn delay_modulation_lfo(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DelayModulationLfo) as f32)
    }

    pub(crate) fn frequency_modulation_lfo(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gs(GeneratorType::FrequencyModulationLfo) as f32)
    }

    pub(crate) fn delay_vibrato_lfo(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DelayVibratoLfo) as f32)
    }

    pub(crate) fn frequency_vibrato_lfo(&self) -> f32 {
        SoundFontMath::cents_to_hertz(self.gs(GeneratorType::FrequencyVibratoLfo) as f32)
    }

    pub(crate) fn delay_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DelayModulationEnvelope) as f32)
    }

    pub(crate) fn attack_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::AttackModulationEnvelope) as f32)
    }

    pub(crate) fn hold_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::HoldModulationEnvelope) as f32)
    }

    pub(crate) fn decay_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DecayModulationEnvelope) as f32)
    }

    pub(crate) fn sustain_modulation_envelope(&self) -> f32 {
        0.1 * self.gs(GeneratorType::SustainModulationEnvelope) as f32
    }

    pub(crate) fn release_modulation_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::ReleaseModulationEnvelope) as f32)
    }

    pub(crate) fn key_number_to_modulation_envelope_hold(&self) -> i32 {
        self.gs(GeneratorType::KeyNumberToModulationEnvelopeHold)
    }

    pub(crate) fn key_number_to_modulation_envelope_decay(&self) -> i32 {
        self.gs(GeneratorType::KeyNumberToModulationEnvelopeDecay)
    }

    pub(crate) fn delay_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DelayVolumeEnvelope) as f32)
    }

    pub(crate) fn attack_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::AttackVolumeEnvelope) as f32)
    }

    pub(crate) fn hold_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::HoldVolumeEnvelope) as f32)
    }

    pub(crate) fn decay_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::DecayVolumeEnvelope) as f32)
    }

    pub(crate) fn sustain_volume_envelope(&self) -> f32 {
        0.1 * self.gs(GeneratorType::SustainVolumeEnvelope) as f32
    }

    pub(crate) fn release_volume_envelope(&self) -> f32 {
        SoundFontMath::timecents_to_seconds(self.gs(GeneratorType::ReleaseVolumeEnvelope) as f32)
    }

    pub(crate) fn key_number_to_volume_envelope_hold(&self) -> i32 {
        self.gs(GeneratorType::KeyNumberToVolumeEnvelopeHold)
    }

    pub(crate) fn key_number_to_volume_envelope_decay(&self) -> i32 {
        self.gs(GeneratorType::KeyNumberToVolumeEnvelopeDecay)
    }

    pub(crate) fn initial_attenuation(&self) -> f32 {
        0.1 * self.gs(GeneratorType::InitialAttenuation) as f32
    }

    pub(crate) fn coarse_tune(&self) -> i32 {
        self.gs(GeneratorType::CoarseTune)
    }

    pub(crate) fn fine_tune(&self) -> i32 {
        self.gs(GeneratorType::FineTune) + self.instrument.sample.pitch_correction as i32
    }

    pub(crate) fn sample_modes(&self) -> LoopMode {
        self.instrument.sample_modes()
    }

    pub(crate) fn scale_tuning(&self) -> i32 {
        self.gs(GeneratorType::ScaleTuning)
    }

    pub(crate) fn exclusive_class(&self) -> i32 {
        self.instrument.exclusive_class()
    }

    pub(crate) fn root_key(&self) -> i32 {
        self.instrument.root_key()
    }
}
