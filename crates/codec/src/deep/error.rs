use ferry_buffers::BufferError;
use thiserror::Error;

/// Failures of the deep decoder and the region-writing encode entry point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeepError {
    /// Input ended inside a value; the stream is truncated.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A back-reference names an offset no slot was recorded at.
    #[error("unresolved back-reference at offset {0}")]
    UnresolvedBackRef(u32),
    /// A text payload was not valid UTF-16.
    #[error("invalid utf-16 text")]
    InvalidText,
    /// A view named a kind outside the agreed set.
    #[error("unknown view kind `{0}`")]
    UnknownViewKind(String),
    /// A fixed-arity composite carried a child of the wrong kind.
    #[error("malformed value payload")]
    Malformed,
    /// The destination region could not be grown to hold the encoding.
    #[error("region capacity exhausted")]
    RegionExhausted,
}

impl From<BufferError> for DeepError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => DeepError::UnexpectedEof,
            BufferError::InvalidUtf16 => DeepError::InvalidText,
            BufferError::RegionExhausted => DeepError::RegionExhausted,
        }
    }
}
