//! Envelope payload types.

use crate::value::{ByteBuf, ErrorValue, ValueGraph, ValueId};
use crate::view::ViewKind;

/// A typed view carried by one envelope, backing store inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEnvelope {
    pub kind: ViewKind,
    pub byte_offset: u32,
    /// Element count; `0` derives the count from the backing buffer.
    pub length: u32,
    pub buffer: ByteBuf,
}

/// Pass-through payload of the envelope's DIRECT tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Direct {
    /// A rich value graph, moved through the deep codec when delegation is
    /// enabled.
    Value(ValueGraph, ValueId),
    /// Opaque bytes the caller has already transformed.
    Bytes(Vec<u8>),
}

/// One logical value crossing the boundary as a single tagged region.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Raw byte buffer with its growth bound.
    Buffer(ByteBuf),
    /// Typed numeric view plus its backing store.
    View(ViewEnvelope),
    /// Pass-through payload.
    Direct(Direct),
    /// Small-integer fast path, carrying a reference id allocated by the
    /// external heap. `tag` must have the [`REMOTE`] marker bit set.
    ///
    /// [`REMOTE`]: super::constants::REMOTE
    Remote { tag: u8, id: i32 },
    /// Captured failure; never coerced into ordinary text.
    Error(ErrorValue),
    /// Generic JSON-compatible payload, escaped as text.
    Json(serde_json::Value),
    /// Absence; travels as a zero-length text.
    Undefined,
}

/// Per-codec configuration shared by the envelope encoder and decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeOptions {
    /// Offset inside the region at which the envelope starts.
    pub byte_offset: usize,
    /// Enables deep-codec delegation for the pass-through tag: rich DIRECT
    /// payloads travel as deep-format bytes written verbatim. Both ends must
    /// agree on this.
    pub direct: bool,
}
