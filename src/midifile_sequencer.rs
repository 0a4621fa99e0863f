use std::cmp;

use crate::midifile::{MidiEvent, MidiFile};
use crate::synthesizer::Synthesizer;

/// Drives a [`Synthesizer`] from a [`MidiFile`]'s merged event sequence,
/// block by block, optionally looping back to the start once the sequence
/// ends.
pub struct MidiFileSequencer {
    synthesizer: Synthesizer,

    midi_file: Option<MidiFile>,
    play_loop: bool,

    block_wrote: usize,

    current_time: f64,
    msg_index: usize,
}

impl MidiFileSequencer {
    /// Initializes a new sequencer driving the given synthesizer.
    pub fn new(synthesizer: Synthesizer) -> Self {
        let block_wrote = synthesizer.block_size;
        Self {
            synthesizer,
            midi_file: None,
            play_loop: false,
            block_wrote,
            current_time: 0.0,
            msg_index: 0,
        }
    }

    /// Starts playing the given MIDI file from the beginning. When `play_loop`
    /// is set, reaching the end of the file sends an all-notes-off and
    /// restarts playback rather than going silent.
    pub fn play(&mut self, midi_file: MidiFile, play_loop: bool) {
        self.midi_file = Some(midi_file);
        self.play_loop = play_loop;
        self.block_wrote = self.synthesizer.block_size;
        self.current_time = 0.0;
        self.msg_index = 0;
        self.synthesizer.reset();
    }

    /// Stops playback and silences the synthesizer.
    pub fn stop(&mut self) {
        self.midi_file = None;
        self.synthesizer.reset();
    }

    /// Renders the waveform into `left`/`right`, which must be the same
    /// length.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        assert!(
            left.len() == right.len(),
            "the output buffers for the left and right must be the same length"
        );

        let left_length = left.len();
        let mut wrote: usize = 0;
        while wrote < left_length {
            if self.block_wrote == self.synthesizer.block_size {
                self.process_events();
                self.block_wrote = 0;
                self.current_time +=
                    self.synthesizer.block_size as f64 / self.synthesizer.sample_rate as f64;
            }

            let src_rem = self.synthesizer.block_size - self.block_wrote;
            let dst_rem = left_length - wrote;
            let rem = cmp::min(src_rem, dst_rem);

            self.synthesizer.render(
                &mut left[wrote..wrote + rem],
                &mut right[wrote..wrote + rem],
            );

            self.block_wrote += rem;
            wrote += rem;
        }
    }

    fn process_events(&mut self) {
        let Some(midi_file) = &self.midi_file else {
            return;
        };

        while self.msg_index < midi_file.events.len() {
            let MidiEvent {
                time,
                channel,
                command,
                data1,
                data2,
            } = midi_file.events[self.msg_index];
            if time > self.current_time {
                break;
            }
            self.synthesizer
                .process_midi_message(channel, command, data1, data2);
            self.msg_index += 1;
        }

        if self.msg_index == midi_file.events.len() {
            if self.play_loop {
                self.synthesizer.note_off_all(false);
                self.current_time = 0.0;
                self.msg_index = 0;
            }
        }
    }

    /// True once playback has reached the end of a non-looping MIDI file.
    pub fn end_of_sequence(&self) -> bool {
        match &self.midi_file {
            Some(midi_file) => !self.play_loop && self.msg_index == midi_file.events.len(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soundfont::SoundFont;
    use crate::synthesizer_settings::SynthesizerSettings;
    use std::io::Cursor;
    use std::sync::Arc;

    fn minimal_sound_font() -> Arc<SoundFont> {
        Arc::new(SoundFont::load(&mut Cursor::new(crate::test_support::minimal_sf2())).unwrap())
    }

    fn minimal_midi_file() -> MidiFile {
        let mut track = Vec::new();
        track.extend([0x00, 0xFF, 0x2F, 0x00]);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6_u32.to_be_bytes());
        bytes.extend_from_slice(&0_u16.to_be_bytes());
        bytes.extend_from_slice(&1_u16.to_be_bytes());
        bytes.extend_from_slice(&480_u16.to_be_bytes());
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&track);

        MidiFile::new(&mut Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn ends_immediately_for_an_empty_file() {
        let synth =
            Synthesizer::new(minimal_sound_font(), &SynthesizerSettings::new(44100)).unwrap();
        let mut sequencer = MidiFileSequencer::new(synth);
        sequencer.play(minimal_midi_file(), false);
        assert!(sequencer.end_of_sequence());
    }

    #[test]
    fn with_no_file_loaded_is_end_of_sequence() {
        let synth =
            Synthesizer::new(minimal_sound_font(), &SynthesizerSettings::new(44100)).unwrap();
        let sequencer = MidiFileSequencer::new(synth);
        assert!(sequencer.end_of_sequence());
    }
}
