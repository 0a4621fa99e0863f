use crate::lfo::Lfo;
use crate::modulation_envelope::ModulationEnvelope;
use crate::oscillator::Oscillator;
use crate::region_pair::RegionPair;
use crate::soundfont_math::SoundFontMath;
use crate::volume_envelope::VolumeEnvelope;

/// Free functions that start a voice's modulators from a [`RegionPair`],
/// applying the key/velocity scaling SF2 generators alone don't carry.
pub(crate) fn start_oscillator(oscillator: &mut Oscillator, region: &RegionPair) {
    oscillator.start(
        region.sample_modes(),
        region.sample_sample_rate(),
        region.sample_start(),
        region.sample_end(),
        region.sample_start_loop(),
        region.sample_end_loop(),
        region.root_key(),
        region.coarse_tune(),
        region.fine_tune(),
        region.scale_tuning(),
    );
}

pub(crate) fn start_volume_envelope(
    envelope: &mut VolumeEnvelope,
    region: &RegionPair,
    key: i32,
) {
    let delay = region.delay_volume_envelope();
    let attack = region.attack_volume_envelope();
    let hold = region.hold_volume_envelope()
        * SoundFontMath::key_number_to_multiplying_factor(
            region.key_number_to_volume_envelope_hold(),
            key,
        );
    let decay = region.decay_volume_envelope()
        * SoundFontMath::key_number_to_multiplying_factor(
            region.key_number_to_volume_envelope_decay(),
            key,
        );
    let sustain = SoundFontMath::decibels_to_linear(-region.sustain_volume_envelope());
    // Release time shorter than 10ms is clamped to avoid pop noise.
    let release = region.release_volume_envelope().max(0.01);

    envelope.start(delay, attack, hold, decay, sustain, release);
}

pub(crate) fn start_modulation_envelope(
    envelope: &mut ModulationEnvelope,
    region: &RegionPair,
    key: i32,
    velocity: i32,
) {
    let delay = region.delay_modulation_envelope();
    // Per TinySoundFont, attack time is adjusted by velocity.
    let attack = region.attack_modulation_envelope() * ((145 - velocity) as f32 / 144.0);
    let hold = region.hold_modulation_envelope()
        * SoundFontMath::key_number_to_multiplying_factor(
            region.key_number_to_modulation_envelope_hold(),
            key,
        );
    let decay = region.decay_modulation_envelope()
        * SoundFontMath::key_number_to_multiplying_factor(
            region.key_number_to_modulation_envelope_decay(),
            key,
        );
    let sustain = 1.0 - region.sustain_modulation_envelope() / 100.0;
    let release = region.release_modulation_envelope();

    envelope.start(delay, attack, hold, decay, sustain, release);
}

pub(crate) fn start_vibrato(lfo: &mut Lfo, region: &RegionPair) {
    lfo.start(region.delay_vibrato_lfo(), region.frequency_vibrato_lfo());
}

pub(crate) fn start_modulation(lfo: &mut Lfo, region: &RegionPair) {
    lfo.start(
        region.delay_modulation_lfo(),
        region.frequency_modulation_lfo(),
    );
}
