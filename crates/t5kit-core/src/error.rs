use thiserror::Error;

pub type Result<T> = std::result::Result<T, T5Error>;

#[derive(Debug, Error)]
pub enum T5Error {
    #[error("device did not answer within the acquisition timeout")]
    AcquisitionTimeout,

    #[error("demodulation failed: {0}")]
    DemodulationFailed(&'static str),

    #[error("no offset satisfies the configuration block layout")]
    StructuralValidationFailed,

    #[error("detection is ambiguous: {0} candidate configurations")]
    AmbiguousDetection(usize),

    #[error("allocation class is 0x{0:02X}, expected 0xE0; the selected modulation is most likely wrong")]
    InconsistentAllocationClass(u8),

    #[error("device did not acknowledge the write")]
    WriteNotAcknowledged,

    #[error("bit buffer too short: need {need} bits, have {have}")]
    BufferTooShort { need: usize, have: usize },

    #[error("block {0} out of range, must be 0-7")]
    BlockOutOfRange(u8),

    #[error("safety check failed: {0}")]
    SafetyCheckFailed(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
