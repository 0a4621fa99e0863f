use std::io::{self, Read};

use crate::binary_reader::BinaryReader;

/// A SoundFont format version, as stored in the `ifil`/`iver` INFO
/// sub-chunks (major, minor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoundFontVersion {
    pub major: i16,
    pub minor: i16,
}

impl SoundFontVersion {
    pub(crate) fn new<R: Read>(reader: &mut R) -> io::Result<Self> {
        let major = BinaryReader::read_i16(reader)?;
        let minor = BinaryReader::read_i16(reader)?;
        Ok(Self { major, minor })
    }
}
