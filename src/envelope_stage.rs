/// The five DAHDSR stages a volume or modulation envelope walks through in
/// order. `process` advances through DELAY/ATTACK/HOLD automatically based
/// on elapsed time; DECAY and RELEASE are terminal until explicitly reset
/// by `start`/`release`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EnvelopeStage {
    Delay,
    Attack,
    Hold,
    Decay,
    Release,
}

impl EnvelopeStage {
    pub(crate) fn next(self) -> Self {
        match self {
            EnvelopeStage::Delay => EnvelopeStage::Attack,
            EnvelopeStage::Attack => EnvelopeStage::Hold,
            EnvelopeStage::Hold => EnvelopeStage::Decay,
            EnvelopeStage::Decay => EnvelopeStage::Release,
            EnvelopeStage::Release => EnvelopeStage::Release,
        }
    }
}
