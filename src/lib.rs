pub mod loop_mode;
pub mod soundfont_math;

mod array_math;
mod bi_quad_filter;
mod binary_reader;
mod channel;
mod envelope_stage;
mod error;
mod four_cc;
mod generator;
mod generator_type;
mod instrument;
mod instrument_region;
mod lfo;
mod midifile;
mod midifile_sequencer;
mod modulation_envelope;
mod oscillator;
mod preset;
mod preset_region;
mod read_counter;
mod region_ex;
mod region_pair;
mod sample_header;
mod soundfont;
mod soundfont_info;
mod soundfont_parameters;
mod soundfont_sampledata;
mod soundfont_version;
mod synthesizer;
mod synthesizer_settings;
mod voice;
mod voice_collection;
mod volume_envelope;
mod zone;

#[cfg(test)]
mod test_support;

pub use self::error::{MidiFileError, SoundFontError};
pub use self::four_cc::FourCC;
pub use self::instrument::Instrument;
pub use self::instrument_region::InstrumentRegion;
pub use self::midifile::MidiFile;
pub use self::midifile_sequencer::MidiFileSequencer;
pub use self::preset::Preset;
pub use self::preset_region::PresetRegion;
pub use self::sample_header::{SampleHeader, SampleType};
pub use self::soundfont::SoundFont;
pub use self::soundfont_info::SoundFontInfo;
pub use self::soundfont_version::SoundFontVersion;
pub use self::synthesizer::{Synthesizer, PERCUSSION_CHANNEL};
pub use self::synthesizer_settings::{SynthesizerError, SynthesizerSettings};
