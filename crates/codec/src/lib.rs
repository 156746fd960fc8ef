//! Structural value codecs for ferry.
//!
//! Two cooperating wire formats move values between execution contexts that
//! cannot share memory or object identity:
//!
//! - [`deep`] — recursive, cycle-safe codec over the full value zoo. Shared
//!   substructure and true cycles survive a roundtrip as shared slots.
//! - [`envelope`] — single-value tag+length codec with a five-byte
//!   small-integer fast path and optional deep-codec delegation for rich
//!   pass-through payloads.
//!
//! Both write into the growable backing region of `ferry_buffers` and share
//! the [`Value`]/[`ValueGraph`] model: an arena of slots whose indices are
//! the identities the back-reference tables key on.

mod token;
mod value;
mod view;

pub mod deep;
pub mod envelope;

pub use token::Token;
pub use value::{deep_eq, ByteBuf, ErrorValue, PatternValue, Value, ValueGraph, ValueId, ViewValue};
pub use view::ViewKind;

pub use deep::{DeepDecoder, DeepEncoder, DeepError};
pub use envelope::{
    Direct, Envelope, EnvelopeDecoder, EnvelopeEncoder, EnvelopeError, EnvelopeOptions,
    ViewEnvelope,
};
