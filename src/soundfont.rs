use std::io::Read;

use crate::binary_reader::BinaryReader;
use crate::error::SoundFontError;
use crate::instrument::Instrument;
use crate::preset::Preset;
use crate::sample_header::SampleHeader;
use crate::soundfont_info::SoundFontInfo;
use crate::soundfont_parameters::SoundFontParameters;
use crate::soundfont_sampledata::SoundFontSampleData;

/// A complete, parsed SoundFont bank: metadata, the decoded sample pool, and
/// the preset/instrument/region hierarchy built from the `pdta` records.
/// Immutable once loaded, so it is natural to share behind an `Arc` across
/// any number of synthesizers.
#[non_exhaustive]
pub struct SoundFont {
    pub info: SoundFontInfo,
    pub(crate) wave_data: Vec<f32>,
    pub sample_headers: Vec<SampleHeader>,
    pub instruments: Vec<Instrument>,
    pub presets: Vec<Preset>,
}

impl SoundFont {
    /// Parses a SoundFont from a `RIFF`/`sfbk` byte stream.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self, SoundFontError> {
        let chunk_id = BinaryReader::read_four_cc(reader)?;
        if chunk_id != "RIFF" {
            return Err(SoundFontError::RiffChunkNotFound);
        }

        // The overall RIFF size is only needed by readers that must skip
        // the file without parsing it; this loader reads every sub-chunk
        // explicitly; the value is discarded.
        BinaryReader::read_i32(reader)?;

        let form_type = BinaryReader::read_four_cc(reader)?;
        if form_type != "sfbk" {
            return Err(SoundFontError::InvalidRiffChunkType {
                expected: "sfbk".into(),
                actual: form_type,
            });
        }

        let info = SoundFontInfo::new(reader)?;
        let sample_data = SoundFontSampleData::new(reader)?;
        if sample_data.bits_per_sample != 16 {
            return Err(SoundFontError::UnsupportedSampleFormat);
        }
        let parameters = SoundFontParameters::new(reader)?;

        Ok(Self {
            info,
            wave_data: sample_data.samples,
            sample_headers: parameters.sample_headers,
            instruments: parameters.instruments,
            presets: parameters.presets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::minimal_sf2;
    use std::io::Cursor;

    #[test]
    fn loads_a_minimal_sound_font() {
        let mut cur = Cursor::new(minimal_sf2());
        let sound_font = SoundFont::load(&mut cur).unwrap();
        assert_eq!(sound_font.presets.len(), 1);
        assert_eq!(sound_font.instruments.len(), 1);
        assert_eq!(sound_font.sample_headers.len(), 1);
        assert!(!sound_font.wave_data.is_empty());
        assert_eq!(sound_font.presets[0].name, "Piano");
    }

    #[test]
    fn rejects_a_non_riff_stream() {
        let mut cur = Cursor::new(b"not a riff file".to_vec());
        assert!(SoundFont::load(&mut cur).is_err());
    }
}
