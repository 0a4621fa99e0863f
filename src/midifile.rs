use std::collections::VecDeque;
use std::io::Read;

use crate::binary_reader::BinaryReader;
use crate::error::MidiFileError;

/// A single channel-voice message extracted from a standard MIDI file,
/// timestamped in seconds and already adjusted for the file's tempo map.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MidiEvent {
    pub(crate) time: f64,
    pub(crate) channel: i32,
    pub(crate) command: u8,
    pub(crate) data1: u8,
    pub(crate) data2: u8,
}

/// Channel-voice message count, keyed off the status nibble, used to pick
/// the number of data bytes the message and running-status bytes imply.
fn data_byte_count(command: u8) -> usize {
    match command & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

/// A parsed standard MIDI file: every track's channel-voice messages merged
/// into a single time-sorted sequence, with tempo (`FF 51`) meta events
/// folded into each message's absolute time rather than emitted as events.
#[derive(Debug)]
pub struct MidiFile {
    pub(crate) events: Vec<MidiEvent>,
}

impl MidiFile {
    pub fn new<R: Read>(reader: &mut R) -> Result<Self, MidiFileError> {
        let chunk_id = BinaryReader::read_four_cc(reader)?;
        if chunk_id != "MThd" {
            return Err(MidiFileError::InvalidChunkType {
                expected: "MThd".into(),
                actual: chunk_id,
            });
        }

        let header_size = BinaryReader::read_i32_be(reader)? as u32;
        if header_size != 6 {
            return Err(MidiFileError::InvalidHeaderChunkSize(header_size));
        }

        let format = BinaryReader::read_u16_be(reader)?;
        if format != 0 && format != 1 {
            return Err(MidiFileError::UnsupportedFormat(format));
        }

        let track_count = BinaryReader::read_u16_be(reader)?;
        let resolution = BinaryReader::read_u16_be(reader)?;
        if resolution & 0x8000 != 0 {
            return Err(MidiFileError::UnsupportedTimingMode);
        }
        let ticks_per_quarter = resolution as f64;

        let mut tracks = Vec::with_capacity(track_count as usize);
        loop {
            let id = match BinaryReader::read_four_cc(reader) {
                Ok(id) => id,
                Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            };
            if id != "MTrk" {
                return Err(MidiFileError::InvalidChunkType {
                    expected: "MTrk".into(),
                    actual: id,
                });
            }
            let size = BinaryReader::read_i32_be(reader)? as usize;
            let mut body = vec![0_u8; size];
            reader.read_exact(&mut body)?;
            tracks.push(Self::read_track(&body)?);
            if tracks.len() == track_count as usize {
                break;
            }
        }

        if tracks.len() != track_count as usize {
            return Err(MidiFileError::TrackCountMismatch {
                expected: track_count,
                actual: tracks.len(),
            });
        }

        let events = Self::merge_tracks(tracks, ticks_per_quarter);
        Ok(Self { events })
    }

    fn read_track(body: &[u8]) -> Result<VecDeque<RawEvent>, MidiFileError> {
        let mut cursor = std::io::Cursor::new(body);
        let mut events = VecDeque::new();
        let mut tick: u64 = 0;
        let mut running_status: Option<u8> = None;
        let mut ended = false;

        while !ended {
            let delta = BinaryReader::read_variable_length(&mut cursor)?
                .ok_or(MidiFileError::InvalidVariableLengthQuantity)?;
            tick += delta as u64;

            let mut status = BinaryReader::read_u8(&mut cursor)?;
            if status < 0x80 {
                // A data byte with no status: reuse the running status and
                // push this byte back by rewinding the cursor by one.
                let pos = cursor.position();
                cursor.set_position(pos - 1);
                status = running_status.ok_or(MidiFileError::UnexpectedEndOfTrack)?;
            } else if status < 0xF0 {
                running_status = Some(status);
            }

            match status {
                0xF0 | 0xF7 => {
                    let length = BinaryReader::read_variable_length(&mut cursor)?
                        .ok_or(MidiFileError::InvalidVariableLengthQuantity)?;
                    let mut discard = vec![0_u8; length as usize];
                    cursor.read_exact(&mut discard)?;
                }
                0xFF => {
                    let meta_type = BinaryReader::read_u8(&mut cursor)?;
                    let length = BinaryReader::read_variable_length(&mut cursor)?
                        .ok_or(MidiFileError::InvalidVariableLengthQuantity)?;
                    let mut payload = vec![0_u8; length as usize];
                    cursor.read_exact(&mut payload)?;
                    match meta_type {
                        0x2F => ended = true,
                        0x51 if payload.len() == 3 => {
                            let microseconds = ((payload[0] as u32) << 16)
                                | ((payload[1] as u32) << 8)
                                | payload[2] as u32;
                            events.push_back(RawEvent::Tempo {
                                tick,
                                microseconds_per_quarter: microseconds as f64,
                            });
                        }
                        _ => (),
                    }
                }
                _ => {
                    let channel = (status & 0x0F) as i32;
                    let command = status & 0xF0;
                    let data1 = BinaryReader::read_u8(&mut cursor)?;
                    let data2 = if data_byte_count(command) == 2 {
                        BinaryReader::read_u8(&mut cursor)?
                    } else {
                        0
                    };
                    events.push_back(RawEvent::Midi {
                        tick,
                        channel,
                        command,
                        data1,
                        data2,
                    });
                }
            }
        }

        Ok(events)
    }

    fn merge_tracks(tracks: Vec<VecDeque<RawEvent>>, ticks_per_quarter: f64) -> Vec<MidiEvent> {
        // First pass: collect every tempo change, in tick order, from every
        // track (tempo meta events conventionally live in the first track of
        // a format-1 file, but nothing requires that).
        let mut tempo_ticks: Vec<(u64, f64)> = Vec::new();
        for track in &tracks {
            for event in track {
                if let RawEvent::Tempo {
                    tick,
                    microseconds_per_quarter,
                } = *event
                {
                    tempo_ticks.push((tick, microseconds_per_quarter));
                }
            }
        }
        tempo_ticks.sort_by_key(|&(tick, _)| tick);

        let tick_to_time = |tick: u64, tempo_ticks: &[(u64, f64)]| -> f64 {
            let mut time = 0.0;
            let mut previous_tick = 0_u64;
            let mut microseconds_per_quarter = 500_000.0;
            for &(change_tick, change_tempo) in tempo_ticks {
                if change_tick >= tick {
                    break;
                }
                let delta_ticks = (change_tick - previous_tick) as f64;
                time += delta_ticks / ticks_per_quarter * microseconds_per_quarter / 1_000_000.0;
                previous_tick = change_tick;
                microseconds_per_quarter = change_tempo;
            }
            let delta_ticks = (tick - previous_tick) as f64;
            time + delta_ticks / ticks_per_quarter * microseconds_per_quarter / 1_000_000.0
        };

        let mut queues: Vec<VecDeque<RawEvent>> = tracks
            .into_iter()
            .map(|track| {
                track
                    .into_iter()
                    .filter(|event| matches!(event, RawEvent::Midi { .. }))
                    .collect()
            })
            .collect();

        let mut merged = Vec::new();
        loop {
            let next_track = queues
                .iter()
                .enumerate()
                .filter_map(|(i, queue)| queue.front().map(|event| (i, event.tick())))
                .min_by_key(|&(_, tick)| tick)
                .map(|(i, _)| i);

            let Some(i) = next_track else { break };
            let event = queues[i].pop_front().unwrap();
            if let RawEvent::Midi {
                tick,
                channel,
                command,
                data1,
                data2,
            } = event
            {
                merged.push(MidiEvent {
                    time: tick_to_time(tick, &tempo_ticks),
                    channel,
                    command,
                    data1,
                    data2,
                });
            }
        }

        merged
    }

    /// The length of the MIDI file in seconds.
    pub fn length(&self) -> f64 {
        self.events.last().map(|event| event.time).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum RawEvent {
    Midi {
        tick: u64,
        channel: i32,
        command: u8,
        data1: u8,
        data2: u8,
    },
    Tempo {
        tick: u64,
        microseconds_per_quarter: f64,
    },
}

impl RawEvent {
    fn tick(&self) -> u64 {
        match *self {
            RawEvent::Midi { tick, .. } => tick,
            RawEvent::Tempo { tick, .. } => tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn vlq(mut value: u32) -> Vec<u8> {
        let mut bytes = vec![(value & 0x7F) as u8];
        value >>= 7;
        while value > 0 {
            bytes.push(((value & 0x7F) as u8) | 0x80);
            value >>= 7;
        }
        bytes.reverse();
        bytes
    }

    fn single_track_file(track_body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6_u32.to_be_bytes());
        bytes.extend_from_slice(&0_u16.to_be_bytes()); // format
        bytes.extend_from_slice(&1_u16.to_be_bytes()); // track count
        bytes.extend_from_slice(&480_u16.to_be_bytes()); // resolution
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track_body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(track_body);
        bytes
    }

    #[test]
    fn parses_a_note_on_and_off_with_end_of_track() {
        let mut track = Vec::new();
        track.extend(vlq(0));
        track.push(0x90);
        track.push(60);
        track.push(100);
        track.extend(vlq(480));
        track.push(0x80);
        track.push(60);
        track.push(0);
        track.extend(vlq(0));
        track.extend([0xFF, 0x2F, 0x00]);

        let bytes = single_track_file(&track);
        let mut cur = Cursor::new(bytes);
        let midi_file = MidiFile::new(&mut cur).unwrap();

        assert_eq!(midi_file.events.len(), 2);
        assert_eq!(midi_file.events[0].command, 0x90);
        assert_eq!(midi_file.events[0].data1, 60);
        assert_eq!(midi_file.events[1].command, 0x80);
        assert!(midi_file.events[1].time > midi_file.events[0].time);
    }

    #[test]
    fn running_status_reuses_previous_command() {
        let mut track = Vec::new();
        track.extend(vlq(0));
        track.push(0x90);
        track.push(60);
        track.push(100);
        track.extend(vlq(0));
        // No status byte: running status (note-on) applies.
        track.push(64);
        track.push(100);
        track.extend(vlq(0));
        track.extend([0xFF, 0x2F, 0x00]);

        let bytes = single_track_file(&track);
        let mut cur = Cursor::new(bytes);
        let midi_file = MidiFile::new(&mut cur).unwrap();

        assert_eq!(midi_file.events.len(), 2);
        assert_eq!(midi_file.events[1].command, 0x90);
        assert_eq!(midi_file.events[1].data1, 64);
    }

    #[test]
    fn tempo_change_stretches_subsequent_timing() {
        let mut track = Vec::new();
        track.extend(vlq(0));
        track.extend([0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40]); // 1_000_000 us/quarter = 60 BPM
        track.extend(vlq(480));
        track.push(0x90);
        track.push(60);
        track.push(100);
        track.extend(vlq(0));
        track.extend([0xFF, 0x2F, 0x00]);

        let bytes = single_track_file(&track);
        let mut cur = Cursor::new(bytes);
        let midi_file = MidiFile::new(&mut cur).unwrap();

        assert_eq!(midi_file.events.len(), 1);
        // 480 ticks at 480 ticks/quarter and 1s/quarter = 1 second.
        assert!((midi_file.events[0].time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_format_2() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6_u32.to_be_bytes());
        bytes.extend_from_slice(&2_u16.to_be_bytes());
        bytes.extend_from_slice(&1_u16.to_be_bytes());
        bytes.extend_from_slice(&480_u16.to_be_bytes());

        let mut cur = Cursor::new(bytes);
        assert!(matches!(
            MidiFile::new(&mut cur),
            Err(MidiFileError::UnsupportedFormat(2))
        ));
    }
}
