use std::io::Read;

use crate::binary_reader::BinaryReader;
use crate::error::SoundFontError;
use crate::read_counter::ReadCounter;

/// The `sdta` sub-list: the PCM sample pool every `shdr` record's offsets
/// index into. 24-bit samples (`sm24`) are out of scope; the chunk is
/// recognized and skipped rather than rejected.
pub(crate) struct SoundFontSampleData {
    pub(crate) bits_per_sample: i32,
    pub(crate) samples: Vec<f32>,
}

impl SoundFontSampleData {
    pub(crate) fn new<R: Read>(reader: &mut R) -> Result<Self, SoundFontError> {
        let chunk_id = BinaryReader::read_four_cc(reader)?;
        if chunk_id != "LIST" {
            return Err(SoundFontError::ListChunkNotFound);
        }

        let end = BinaryReader::read_i32(reader)? as usize;
        let reader = &mut ReadCounter::new(reader);

        let list_type = BinaryReader::read_four_cc(reader)?;
        if list_type != "sdta" {
            return Err(SoundFontError::InvalidListChunkType {
                expected: "sdta".into(),
                actual: list_type,
            });
        }

        let mut bits_per_sample = 0_i32;
        let mut samples: Option<Vec<f32>> = None;

        while reader.bytes_read() < end {
            let id = BinaryReader::read_four_cc(reader)?;
            let size = BinaryReader::read_i32(reader)? as usize;

            if id == "smpl" {
                bits_per_sample = 16;
                samples = Some(Self::read_as_float_array(reader, size)?);
            } else if id == "sm24" {
                let mut discard = vec![0_u8; size];
                std::io::Read::read_exact(reader, &mut discard)?;
            } else {
                return Err(SoundFontError::ListContainsUnknownId(id));
            }
        }

        let samples = samples.ok_or(SoundFontError::SampleDataNotFound)?;
        Ok(Self {
            bits_per_sample,
            samples,
        })
    }

    fn read_as_float_array<R: Read>(reader: &mut R, size: usize) -> Result<Vec<f32>, SoundFontError> {
        let count = size / 2;
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = BinaryReader::read_i16(reader)?;
            samples.push(raw as f32 / 32768.0);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_smpl_chunk_and_skips_sm24() {
        let mut body = Vec::new();
        body.extend_from_slice(b"sdta");
        body.extend_from_slice(b"smpl");
        body.extend_from_slice(&4_i32.to_le_bytes());
        body.extend_from_slice(&16384_i16.to_le_bytes());
        body.extend_from_slice(&(-16384_i16).to_le_bytes());
        body.extend_from_slice(b"sm24");
        body.extend_from_slice(&2_i32.to_le_bytes());
        body.extend_from_slice(&[0_u8, 0]);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&(body.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&body);

        let mut cur = Cursor::new(bytes);
        let data = SoundFontSampleData::new(&mut cur).unwrap();
        assert_eq!(data.bits_per_sample, 16);
        assert_eq!(data.samples.len(), 2);
        assert!((data.samples[0] - 0.5).abs() < 1e-4);
    }
}
