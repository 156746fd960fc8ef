//! Envelope codec — single-value, tag+length-prefixed wire format.
//!
//! Moves one route message into a pre-allocated, possibly growable backing
//! region: four structural kinds (raw buffer, typed view, escaped text,
//! opaque pass-through) plus captured failures and a five-byte small-integer
//! fast path for remote-reference ids. Rich pass-through payloads delegate
//! to the deep codec when both ends enable it.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;

pub use decoder::EnvelopeDecoder;
pub use encoder::EnvelopeEncoder;
pub use error::EnvelopeError;
pub use types::{Direct, Envelope, EnvelopeOptions, ViewEnvelope};
