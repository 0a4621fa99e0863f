/// Specifies how the sample loops during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// The sample will be played without loop.
    NoLoop,
    /// The sample will loop continuously.
    Continuous,
    /// The sample will loop until the note stops.
    LoopUntilNoteOff,
}

impl LoopMode {
    /// `sampleModes` value 2 is reserved and must be treated as `NoLoop`.
    pub(crate) fn from_raw(raw: i16) -> Self {
        match raw {
            1 => LoopMode::Continuous,
            3 => LoopMode::LoopUntilNoteOff,
            _ => LoopMode::NoLoop,
        }
    }
}
