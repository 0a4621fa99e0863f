use crate::array_math::ArrayMath;
use crate::channel::Channel;
use crate::preset::Preset;
use crate::region_pair::RegionPair;
use crate::soundfont::SoundFont;
use crate::soundfont_math::SoundFontMath;
use crate::synthesizer_settings::{SynthesizerError, SynthesizerSettings};
use crate::voice_collection::VoiceCollection;
use std::cmp;
use std::collections::HashMap;
use std::sync::Arc;

/// The MIDI channel conventionally reserved for percussion.
pub const PERCUSSION_CHANNEL: usize = 9;

const CHANNEL_COUNT: usize = 16;

/// An instance of the SoundFont synthesizer: owns a loaded bank, 16 MIDI
/// channels, and a voice pool, and renders a block-buffered stereo stream.
#[derive(Debug)]
pub struct Synthesizer {
    sound_font: Arc<SoundFont>,
    pub(crate) sample_rate: i32,
    pub(crate) block_size: usize,

    preset_lookup: HashMap<i32, usize>,
    default_preset: usize,

    channels: Vec<Channel>,

    voices: VoiceCollection,

    block_left: Vec<f32>,
    block_right: Vec<f32>,

    inverse_block_size: f32,
    block_read: usize,

    master_volume: f32,
}

fn write_block(
    previous_gain: f32,
    current_gain: f32,
    source: &[f32],
    destination: &mut [f32],
    inverse_block_size: f32,
) {
    if SoundFontMath::max(previous_gain, current_gain) < SoundFontMath::NON_AUDIBLE {
        return;
    }

    if (current_gain - previous_gain).abs() < 1.0e-3 {
        ArrayMath::multiply_add(current_gain, source, destination);
    } else {
        let step = inverse_block_size * (current_gain - previous_gain);
        ArrayMath::multiply_add_slope(previous_gain, step, source, destination);
    }
}

fn preset_id(bank: i32, patch: i32) -> i32 {
    (bank << 16) | patch
}

fn build_preset_lookup(presets: &[Preset]) -> (HashMap<i32, usize>, usize) {
    let mut lookup = HashMap::with_capacity(presets.len());
    let mut default_preset = 0;
    let mut smallest_id = i32::MAX;
    for (i, preset) in presets.iter().enumerate() {
        let id = preset_id(preset.bank_number, preset.patch_number);
        lookup.insert(id, i);
        if id < smallest_id {
            smallest_id = id;
            default_preset = i;
        }
    }
    (lookup, default_preset)
}

impl Synthesizer {
    /// Initializes a new synthesizer using a specified SoundFont and settings.
    pub fn new(
        sound_font: Arc<SoundFont>,
        settings: &SynthesizerSettings,
    ) -> Result<Self, SynthesizerError> {
        settings.validate()?;

        let channels = (0..CHANNEL_COUNT)
            .map(|i| Channel::new(i == PERCUSSION_CHANNEL))
            .collect();

        let voices = VoiceCollection::new(
            settings.sample_rate,
            settings.block_size,
            settings.maximum_polyphony,
        );

        let (preset_lookup, default_preset) = build_preset_lookup(&sound_font.presets);

        let block_left = vec![0.0; settings.block_size];
        let block_right = vec![0.0; settings.block_size];
        let inverse_block_size = 1.0 / settings.block_size as f32;
        let block_read = settings.block_size;

        Ok(Self {
            sound_font,
            sample_rate: settings.sample_rate,
            block_size: settings.block_size,
            preset_lookup,
            default_preset,
            channels,
            voices,
            block_left,
            block_right,
            inverse_block_size,
            block_read,
            master_volume: 0.5,
        })
    }

    /// Dispatches a raw MIDI channel-voice message: `command` is the status
    /// nibble (`0x80`/`0x90`/`0xB0`/`0xC0`/`0xE0`), `data1`/`data2` its data
    /// bytes (`data2` unused for `0xC0`).
    pub fn process_midi_message(&mut self, channel: i32, command: u8, data1: u8, data2: u8) {
        if channel < 0 || channel as usize >= self.channels.len() {
            return;
        }

        match command {
            0x80 => self.note_off(channel, data1 as i32),
            0x90 => self.note_on(channel, data1 as i32, data2 as i32),
            0xB0 => self.control_change(channel, data1, data2),
            0xC0 => self.channels[channel as usize].set_patch(data1),
            0xE0 => {
                let value = ((data2 as u16) << 7) | data1 as u16;
                self.channels[channel as usize].set_pitch_bend(value);
            }
            _ => (),
        }
    }

    fn control_change(&mut self, channel: i32, controller: u8, value: u8) {
        let channel_info = &mut self.channels[channel as usize];
        match controller {
            0x00 => channel_info.set_bank(value),
            0x01 => channel_info.set_modulation_coarse(value),
            0x21 => channel_info.set_modulation_fine(value),
            0x06 => channel_info.data_entry_coarse(value),
            0x26 => channel_info.data_entry_fine(value),
            0x07 => channel_info.set_volume_coarse(value),
            0x27 => channel_info.set_volume_fine(value),
            0x0A => channel_info.set_pan_coarse(value),
            0x2A => channel_info.set_pan_fine(value),
            0x0B => channel_info.set_expression_coarse(value),
            0x2B => channel_info.set_expression_fine(value),
            0x40 => channel_info.set_hold_pedal(value),
            0x5B => channel_info.set_reverb_send(value),
            0x5D => channel_info.set_chorus_send(value),
            0x63 => channel_info.set_nrpn_coarse(value),
            0x62 => channel_info.set_nrpn_fine(value),
            0x65 => channel_info.set_rpn_coarse(value),
            0x64 => channel_info.set_rpn_fine(value),
            0x78 => self.note_off_all_channel(channel, true),
            0x79 => self.reset_all_controllers_channel(channel),
            0x7B => self.note_off_all_channel(channel, false),
            _ => (),
        }
    }

    /// Stops a note.
    pub fn note_off(&mut self, channel: i32, key: i32) {
        for voice in self.voices.active_voices().iter_mut() {
            if voice.channel == channel && voice.key == key {
                voice.end();
            }
        }
    }

    /// Starts a note.
    pub fn note_on(&mut self, channel: i32, key: i32, velocity: i32) {
        if velocity == 0 {
            self.note_off(channel, key);
            return;
        }

        let channel_info = &self.channels[channel as usize];
        let bank = channel_info.bank_number();
        let patch = channel_info.patch_number();

        let preset_index = self
            .preset_lookup
            .get(&preset_id(bank, patch))
            .or_else(|| {
                if bank < 128 {
                    self.preset_lookup.get(&preset_id(0, patch))
                } else {
                    self.preset_lookup.get(&preset_id(128, 0))
                }
            })
            .copied()
            .unwrap_or(self.default_preset);

        let preset = &self.sound_font.presets[preset_index];
        for preset_region in &preset.regions {
            if !preset_region.contains(key, velocity) {
                continue;
            }
            let instrument = preset_region.instrument(&self.sound_font.instruments);
            for instrument_region in &instrument.regions {
                if !instrument_region.contains(key, velocity) {
                    continue;
                }
                let region_pair = RegionPair::new(preset_region, instrument_region);
                let voice = self.voices.request_new(&region_pair, channel);
                voice.start(&region_pair, channel, key, velocity);
            }
        }
    }

    /// Stops all the notes.
    pub fn note_off_all(&mut self, immediate: bool) {
        if immediate {
            self.voices.clear();
        } else {
            for voice in self.voices.active_voices().iter_mut() {
                voice.end();
            }
        }
    }

    /// Stops all the notes in the specified channel.
    pub fn note_off_all_channel(&mut self, channel: i32, immediate: bool) {
        for voice in self.voices.active_voices().iter_mut() {
            if voice.channel == channel {
                if immediate {
                    voice.kill();
                } else {
                    voice.end();
                }
            }
        }
    }

    /// Resets all the controllers.
    pub fn reset_all_controllers(&mut self) {
        for channel in &mut self.channels {
            channel.reset_all_controllers();
        }
    }

    /// Resets all the controllers of the specified channel.
    pub fn reset_all_controllers_channel(&mut self, channel: i32) {
        self.channels[channel as usize].reset_all_controllers();
    }

    /// Resets the synthesizer: clears all voices and channel state.
    pub fn reset(&mut self) {
        self.voices.clear();

        for channel in &mut self.channels {
            channel.reset();
        }

        self.block_read = self.block_size;
    }

    pub(crate) fn active_voice_count(&mut self) -> usize {
        self.voices.active_voice_count()
    }

    /// Renders the waveform into `left`/`right`, which must be the same
    /// length.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        assert!(
            left.len() == right.len(),
            "the output buffers for the left and right must be the same length"
        );

        let left_length = left.len();

        let mut wrote = 0;
        while wrote < left_length {
            if self.block_read == self.block_size {
                self.render_block();
                self.block_read = 0;
            }

            let src_rem = self.block_size - self.block_read;
            let dst_rem = left_length - wrote;
            let rem = cmp::min(src_rem, dst_rem);

            left[wrote..wrote + rem]
                .copy_from_slice(&self.block_left[self.block_read..self.block_read + rem]);
            right[wrote..wrote + rem]
                .copy_from_slice(&self.block_right[self.block_read..self.block_read + rem]);

            self.block_read += rem;
            wrote += rem;
        }
    }

    fn render_block(&mut self) {
        self.voices.process(&self.sound_font.wave_data, &self.channels);

        self.block_left.fill(0.0);
        self.block_right.fill(0.0);
        for voice in self.voices.active_voices().iter_mut() {
            let previous_gain_left = self.master_volume * voice.previous_mix_gain_left;
            let current_gain_left = self.master_volume * voice.current_mix_gain_left;
            write_block(
                previous_gain_left,
                current_gain_left,
                &voice.block[..],
                &mut self.block_left[..],
                self.inverse_block_size,
            );
            let previous_gain_right = self.master_volume * voice.previous_mix_gain_right;
            let current_gain_right = self.master_volume * voice.current_mix_gain_right;
            write_block(
                previous_gain_right,
                current_gain_right,
                &voice.block[..],
                &mut self.block_right[..],
                self.inverse_block_size,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_id_combines_bank_and_patch() {
        assert_eq!(preset_id(128, 0), 128 << 16);
        assert_eq!(preset_id(0, 5), 5);
    }
}
