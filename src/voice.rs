use crate::bi_quad_filter::BiQuadFilter;
use crate::channel::Channel;
use crate::lfo::Lfo;
use crate::modulation_envelope::ModulationEnvelope;
use crate::oscillator::Oscillator;
use crate::region_ex;
use crate::region_pair::RegionPair;
use crate::soundfont_math::SoundFontMath;
use crate::volume_envelope::VolumeEnvelope;
use std::f32::consts;

#[derive(Debug, Default, Eq, PartialEq)]
enum VoiceState {
    #[default]
    Playing,
    ReleaseRequested,
    Released,
}

/// A single sample-playing voice: one oscillator, one pair of envelopes, a
/// vibrato and a modulation LFO, and a low-pass filter, mixed down to a
/// stereo gain pair each block.
#[derive(Debug)]
pub(crate) struct Voice {
    sample_rate: i32,
    block_size: usize,

    vol_env: VolumeEnvelope,
    mod_env: ModulationEnvelope,

    vib_lfo: Lfo,
    mod_lfo: Lfo,

    oscillator: Oscillator,
    filter: BiQuadFilter,

    pub(crate) block: Vec<f32>,

    // A sudden change in mix gain pops; the previous block's gain is kept
    // around so the synthesizer can ramp across the gap instead.
    pub(crate) previous_mix_gain_left: f32,
    pub(crate) previous_mix_gain_right: f32,
    pub(crate) current_mix_gain_left: f32,
    pub(crate) current_mix_gain_right: f32,

    pub(crate) previous_reverb_send: f32,
    pub(crate) previous_chorus_send: f32,
    pub(crate) current_reverb_send: f32,
    pub(crate) current_chorus_send: f32,

    pub(crate) channel: i32,
    pub(crate) key: i32,
    pub(crate) velocity: i32,
    pub(crate) exclusive_class: i32,

    note_gain: f32,

    cutoff: f32,
    resonance: f32,

    vib_lfo_to_pitch: f32,
    mod_lfo_to_pitch: f32,
    mod_env_to_pitch: f32,

    mod_lfo_to_cutoff: i32,
    mod_env_to_cutoff: i32,
    dynamic_cutoff: bool,

    mod_lfo_to_volume: f32,
    dynamic_volume: bool,

    instrument_pan: f32,
    instrument_reverb: f32,
    instrument_chorus: f32,

    // Fast cutoff changes pop; this tracks the smoothed target.
    smoothed_cutoff: f32,

    voice_state: VoiceState,
    pub(crate) voice_length: usize,
}

impl Voice {
    pub(crate) fn new(sample_rate: i32, block_size: usize) -> Self {
        Self {
            sample_rate,
            block_size,
            vol_env: VolumeEnvelope::new(sample_rate),
            mod_env: ModulationEnvelope::new(sample_rate),
            vib_lfo: Lfo::new(sample_rate),
            mod_lfo: Lfo::new(sample_rate),
            oscillator: Oscillator::new(sample_rate),
            filter: BiQuadFilter::new(sample_rate),
            block: vec![0.0; block_size],
            previous_mix_gain_left: 0.0,
            previous_mix_gain_right: 0.0,
            current_mix_gain_left: 0.0,
            current_mix_gain_right: 0.0,
            previous_reverb_send: 0.0,
            previous_chorus_send: 0.0,
            current_reverb_send: 0.0,
            current_chorus_send: 0.0,
            channel: 0,
            key: 0,
            velocity: 0,
            exclusive_class: 0,
            note_gain: 0.0,
            cutoff: 0.0,
            resonance: 0.0,
            vib_lfo_to_pitch: 0.0,
            mod_lfo_to_pitch: 0.0,
            mod_env_to_pitch: 0.0,
            mod_lfo_to_cutoff: 0,
            mod_env_to_cutoff: 0,
            dynamic_cutoff: false,
            mod_lfo_to_volume: 0.0,
            dynamic_volume: false,
            instrument_pan: 0.0,
            instrument_reverb: 0.0,
            instrument_chorus: 0.0,
            smoothed_cutoff: 0.0,
            voice_state: VoiceState::default(),
            voice_length: 0,
        }
    }

    pub(crate) fn start(&mut self, region: &RegionPair, channel: i32, key: i32, velocity: i32) {
        self.channel = channel;
        self.key = key;
        self.velocity = velocity;
        self.exclusive_class = region.exclusive_class();

        if velocity > 0 {
            // Per Polyphone, attenuation is scaled to 40% for loudness variability.
            let sample_attenuation = 0.4 * region.initial_attenuation();
            let filter_attenuation = 0.5 * region.initial_filter_q();
            let decibels = 2.0 * SoundFontMath::linear_to_decibels(velocity as f32 / 127.0)
                - sample_attenuation
                - filter_attenuation;
            self.note_gain = SoundFontMath::decibels_to_linear(decibels);
        } else {
            self.note_gain = 0.0;
        }

        self.cutoff = region.initial_filter_cutoff_frequency();
        self.resonance = region.initial_filter_q();

        self.vib_lfo_to_pitch = 0.01 * region.vibrato_lfo_to_pitch() as f32;
        self.mod_lfo_to_pitch = 0.01 * region.modulation_lfo_to_pitch() as f32;
        self.mod_env_to_pitch = 0.01 * region.modulation_envelope_to_pitch() as f32;

        self.mod_lfo_to_cutoff = region.modulation_lfo_to_filter_cutoff_frequency();
        self.mod_env_to_cutoff = region.modulation_envelope_to_filter_cutoff_frequency();
        self.dynamic_cutoff = self.mod_lfo_to_cutoff != 0 || self.mod_env_to_cutoff != 0;

        self.mod_lfo_to_volume = region.modulation_lfo_to_volume();
        self.dynamic_volume = self.mod_lfo_to_volume > 0.05;

        self.instrument_pan = region.pan();
        self.instrument_reverb = region.reverb_effects_send();
        self.instrument_chorus = region.chorus_effects_send();

        region_ex::start_volume_envelope(&mut self.vol_env, region, key);
        region_ex::start_modulation_envelope(&mut self.mod_env, region, key, velocity);
        region_ex::start_vibrato(&mut self.vib_lfo, region);
        region_ex::start_modulation(&mut self.mod_lfo, region);
        region_ex::start_oscillator(&mut self.oscillator, region);
        self.filter.clear_buffer();
        self.filter.set_low_pass_filter(self.cutoff, self.resonance);

        self.smoothed_cutoff = self.cutoff;

        self.voice_state = VoiceState::Playing;
        self.voice_length = 0;
    }

    pub(crate) fn end(&mut self) {
        if self.voice_state == VoiceState::Playing {
            self.voice_state = VoiceState::ReleaseRequested;
        }
    }

    pub(crate) fn kill(&mut self) {
        self.note_gain = 0.0;
    }

    pub(crate) fn process(&mut self, data: &[f32], channel_info: &Channel) -> bool {
        if self.note_gain < SoundFontMath::NON_AUDIBLE {
            return false;
        }

        self.release_if_necessary(channel_info);

        if !self.vol_env.process(self.block_size as i32) {
            return false;
        }

        self.mod_env.process(self.block_size as i32);
        self.vib_lfo.process(self.block_size as i32);
        self.mod_lfo.process(self.block_size as i32);

        let vib_pitch_change = (0.01 * channel_info.modulation() + self.vib_lfo_to_pitch)
            * self.vib_lfo.value();
        let mod_pitch_change = self.mod_lfo_to_pitch * self.mod_lfo.value()
            + self.mod_env_to_pitch * self.mod_env.value();
        let channel_pitch_change = channel_info.tune() + channel_info.pitch_bend();
        let pitch = self.key as f32 + vib_pitch_change + mod_pitch_change + channel_pitch_change;
        if !self.oscillator.process(&mut self.block[..], data, pitch) {
            return false;
        }

        if self.dynamic_cutoff {
            let cents = self.mod_lfo_to_cutoff as f32 * self.mod_lfo.value()
                + self.mod_env_to_cutoff as f32 * self.mod_env.value();
            let factor = SoundFontMath::cents_to_multiplying_factor(cents);
            let new_cutoff = factor * self.cutoff;

            // Limited to x0.5..x2 to reduce pop noise.
            let lower_limit = 0.5 * self.smoothed_cutoff;
            let upper_limit = 2.0 * self.smoothed_cutoff;
            self.smoothed_cutoff = new_cutoff.clamp(lower_limit, upper_limit);

            self.filter
                .set_low_pass_filter(self.smoothed_cutoff, self.resonance);
        }
        self.filter.process(&mut self.block[..]);

        self.previous_mix_gain_left = self.current_mix_gain_left;
        self.previous_mix_gain_right = self.current_mix_gain_right;
        self.previous_reverb_send = self.current_reverb_send;
        self.previous_chorus_send = self.current_chorus_send;

        // Per the GM spec, this value should be squared.
        let ve = channel_info.volume() * channel_info.expression();
        let channel_gain = ve * ve;

        let mut mix_gain = self.note_gain * channel_gain * self.vol_env.value();
        if self.dynamic_volume {
            let decibels = self.mod_lfo_to_volume * self.mod_lfo.value();
            mix_gain *= SoundFontMath::decibels_to_linear(decibels);
        }

        let angle =
            (consts::PI / 200.0) * (channel_info.pan() + self.instrument_pan + 50.0);
        if angle <= 0.0 {
            self.current_mix_gain_left = mix_gain;
            self.current_mix_gain_right = 0.0;
        } else if angle >= SoundFontMath::HALF_PI {
            self.current_mix_gain_left = 0.0;
            self.current_mix_gain_right = mix_gain;
        } else {
            self.current_mix_gain_left = mix_gain * angle.cos();
            self.current_mix_gain_right = mix_gain * angle.sin();
        }

        self.current_reverb_send =
            (channel_info.reverb_send() + self.instrument_reverb).clamp(0.0, 1.0);
        self.current_chorus_send =
            (channel_info.chorus_send() + self.instrument_chorus).clamp(0.0, 1.0);

        if self.voice_length == 0 {
            self.previous_mix_gain_left = self.current_mix_gain_left;
            self.previous_mix_gain_right = self.current_mix_gain_right;
            self.previous_reverb_send = self.current_reverb_send;
            self.previous_chorus_send = self.current_chorus_send;
        }

        self.voice_length += self.block_size;

        true
    }

    fn release_if_necessary(&mut self, channel_info: &Channel) {
        let minimum_voice_length = (self.sample_rate / 500) as usize;
        if self.voice_length < minimum_voice_length {
            return;
        }

        if self.voice_state == VoiceState::ReleaseRequested && !channel_info.hold_pedal() {
            self.vol_env.release();
            self.mod_env.release();
            self.oscillator.release();

            self.voice_state = VoiceState::Released;
        }
    }

    pub(crate) fn priority(&self) -> f32 {
        if self.note_gain < SoundFontMath::NON_AUDIBLE {
            0.0
        } else {
            self.vol_env.priority()
        }
    }
}
