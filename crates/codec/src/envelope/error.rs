use ferry_buffers::BufferError;
use thiserror::Error;

use crate::deep::DeepError;

/// Failures of the envelope encoder/decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The region ended inside the envelope being read.
    #[error("unexpected end of region")]
    UnexpectedEof,
    /// The destination region could not be grown for a write.
    #[error("region capacity exhausted")]
    RegionExhausted,
    /// A text payload was not valid UTF-16.
    #[error("invalid utf-16 text")]
    InvalidText,
    /// A text payload did not parse as JSON.
    #[error("invalid json payload: {0}")]
    InvalidJson(String),
    /// A view named a kind outside the agreed set.
    #[error("unknown view kind `{0}`")]
    UnknownViewKind(String),
    /// The envelope's structure did not match its tag.
    #[error("invalid envelope payload")]
    InvalidPayload,
    /// A delegated deep payload failed to decode.
    #[error(transparent)]
    Deep(#[from] DeepError),
}

impl From<BufferError> for EnvelopeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => EnvelopeError::UnexpectedEof,
            BufferError::InvalidUtf16 => EnvelopeError::InvalidText,
            BufferError::RegionExhausted => EnvelopeError::RegionExhausted,
        }
    }
}
