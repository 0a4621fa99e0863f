use std::io::{self, Read};

use crate::binary_reader::BinaryReader;
use crate::error::SoundFontError;

/// The `shdr` record's sample-type bitfield: which channel of a stereo pair
/// a sample is (or a ROM sample the loader has no data for).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    Mono,
    Right,
    Left,
    Linked,
    RomMono,
    RomRight,
    RomLeft,
    RomLinked,
}

impl SampleType {
    fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            1 => SampleType::Mono,
            2 => SampleType::Right,
            4 => SampleType::Left,
            8 => SampleType::Linked,
            0x8001 => SampleType::RomMono,
            0x8002 => SampleType::RomRight,
            0x8004 => SampleType::RomLeft,
            0x8008 => SampleType::RomLinked,
            _ => return None,
        })
    }

    pub(crate) fn is_rom(&self) -> bool {
        matches!(
            self,
            SampleType::RomMono | SampleType::RomRight | SampleType::RomLeft | SampleType::RomLinked
        )
    }
}

/// A single `shdr` record: the sample's name, its byte range within the
/// `smpl` chunk, loop points, native sample rate, and pitch metadata used to
/// transpose it to the key it's played at.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SampleHeader {
    pub name: String,
    pub start: i32,
    pub end: i32,
    pub start_loop: i32,
    pub end_loop: i32,
    pub sample_rate: i32,
    pub original_pitch: u8,
    pub pitch_correction: i8,
    pub link: u16,
    pub sample_type: SampleType,
}

impl SampleHeader {
    const RECORD_SIZE: usize = 46;

    fn read<R: Read>(reader: &mut R) -> Result<Self, SoundFontError> {
        let name = BinaryReader::read_fixed_length_string(reader, 20)?;
        let start = BinaryReader::read_i32(reader)?;
        let end = BinaryReader::read_i32(reader)?;
        let start_loop = BinaryReader::read_i32(reader)?;
        let end_loop = BinaryReader::read_i32(reader)?;
        let sample_rate = BinaryReader::read_i32(reader)?;
        let original_pitch = BinaryReader::read_u8(reader)?;
        let pitch_correction = BinaryReader::read_u8(reader)? as i8;
        let link = BinaryReader::read_u16(reader)?;
        let raw_type = BinaryReader::read_u16(reader)?;
        let sample_type = SampleType::from_raw(raw_type).unwrap_or(SampleType::Mono);

        Ok(Self {
            name,
            start,
            end,
            start_loop,
            end_loop,
            sample_rate,
            original_pitch,
            pitch_correction,
            link,
            sample_type,
        })
    }

    /// Reads the `shdr` sub-chunk's full record array and discards the
    /// terminator record, as SF2 requires every `shdr` chunk to end with one.
    pub(crate) fn read_from_chunk<R: Read>(
        reader: &mut R,
        size: usize,
    ) -> Result<Vec<Self>, SoundFontError> {
        if size % Self::RECORD_SIZE != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "the sample header list is invalid",
            )
            .into());
        }

        let count = size / Self::RECORD_SIZE - 1;
        let mut headers = Vec::with_capacity(count);
        for _ in 0..count {
            headers.push(Self::read(reader)?);
        }
        Self::read(reader)?; // terminator
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_bytes(name: &str) -> Vec<u8> {
        let mut buf = vec![0_u8; 46];
        let name_bytes = name.as_bytes();
        buf[..name_bytes.len()].copy_from_slice(name_bytes);
        buf[20..24].copy_from_slice(&100_i32.to_le_bytes());
        buf[24..28].copy_from_slice(&1000_i32.to_le_bytes());
        buf[28..32].copy_from_slice(&200_i32.to_le_bytes());
        buf[32..36].copy_from_slice(&900_i32.to_le_bytes());
        buf[36..40].copy_from_slice(&44100_i32.to_le_bytes());
        buf[40] = 60;
        buf[42..44].copy_from_slice(&0_u16.to_le_bytes());
        buf[44..46].copy_from_slice(&1_u16.to_le_bytes());
        buf
    }

    #[test]
    fn reads_single_header_and_discards_terminator() {
        let mut bytes = sample_bytes("Piano");
        bytes.extend(sample_bytes(""));
        let mut cur = Cursor::new(bytes);
        let headers = SampleHeader::read_from_chunk(&mut cur, 92).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "Piano");
        assert_eq!(headers[0].start, 100);
        assert_eq!(headers[0].sample_type, SampleType::Mono);
    }

    #[test]
    fn rejects_size_not_multiple_of_record_size() {
        let mut cur = Cursor::new(vec![0_u8; 10]);
        assert!(SampleHeader::read_from_chunk(&mut cur, 10).is_err());
    }
}
