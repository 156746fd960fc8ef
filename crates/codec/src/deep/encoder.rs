//! `DeepEncoder` — recursive, cycle-safe encoder for the deep wire format.

use std::collections::HashMap;

use ferry_buffers::{Region, Writer};

use super::constants::*;
use super::error::DeepError;
use crate::value::{Value, ValueGraph, ValueId};

/// Back-reference table for one encode call.
///
/// Composites key by slot identity; text keys by content, because equal text
/// must intern to one wire occurrence. Both map to the byte offset at which
/// the value's tag was first written.
#[derive(Default)]
struct Slots {
    by_node: HashMap<u32, u32>,
    by_text: HashMap<String, u32>,
}

/// Recursive encoder over a value graph.
///
/// Handles arbitrary nesting, shared substructure, and true cycles. The
/// back-reference table lives for exactly one [`encode`] call; the encoder
/// holds no state between calls other than its writer.
///
/// [`encode`]: DeepEncoder::encode
pub struct DeepEncoder {
    pub writer: Writer,
}

impl Default for DeepEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        Self { writer }
    }

    /// Encodes the value behind `root` into a flat byte sequence.
    ///
    /// Total over the model: every [`Value`] variant has a wire form, so
    /// encoding cannot fail. `root` and every id reachable from it must
    /// belong to `graph`.
    pub fn encode(&mut self, graph: &ValueGraph, root: ValueId) -> Vec<u8> {
        self.writer.reset();
        let mut slots = Slots::default();
        self.write_value(graph, root, &mut slots);
        self.writer.flush()
    }

    /// Encodes into a backing region at `byte_offset`, growing the region in
    /// place first. Returns the number of bytes written.
    pub fn encode_into(
        &mut self,
        graph: &ValueGraph,
        root: ValueId,
        region: &mut Region,
        byte_offset: usize,
    ) -> Result<usize, DeepError> {
        let bytes = self.encode(graph, root);
        region.ensure(byte_offset + bytes.len())?;
        region.as_mut_slice()[byte_offset..byte_offset + bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Byte offset of the next write, relative to the start of this encode.
    fn offset(&self) -> u32 {
        self.writer.written() as u32
    }

    /// Consults the identity table for `id`. On a re-encounter writes a
    /// back-reference and returns `true`; otherwise records the slot at the
    /// current offset — before the tag is written, so children may point
    /// back at it — and returns `false`.
    fn note_slot(&mut self, id: ValueId, slots: &mut Slots) -> bool {
        if let Some(&offset) = slots.by_node.get(&id.0) {
            self.writer.u8u32(BACKREF, offset);
            return true;
        }
        slots.by_node.insert(id.0, self.offset());
        false
    }

    fn write_value(&mut self, graph: &ValueGraph, id: ValueId, slots: &mut Slots) {
        match graph.node(id) {
            Value::Null => self.writer.u8(NULL),
            Value::Undefined => self.writer.u8(UNDEFINED),
            Value::Bool(b) => self.writer.u8(if *b { TRUE } else { FALSE }),
            Value::Float(f) => self.write_number(*f),
            Value::Int(i) => {
                self.writer.u8(INT64);
                self.writer.i64(*i);
            }
            Value::UInt(u) => {
                self.writer.u8(UINT64);
                self.writer.u64(*u);
            }
            Value::Str(s) => self.write_text(s, slots),
            Value::Token(token) => {
                self.writer.u8(TOKEN);
                self.write_text(&token.name(), slots);
            }
            Value::List(items) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8u32(LIST, items.len() as u32);
                for &child in items {
                    self.write_value(graph, child, slots);
                }
            }
            Value::Record(pairs) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8u32(RECORD, pairs.len() as u32);
                for &(key, val) in pairs {
                    self.write_value(graph, key, slots);
                    self.write_value(graph, val, slots);
                }
            }
            Value::Map(pairs) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8u32(MAP, pairs.len() as u32);
                for &(key, val) in pairs {
                    self.write_value(graph, key, slots);
                    self.write_value(graph, val, slots);
                }
            }
            Value::Set(items) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8u32(SET, items.len() as u32);
                for &child in items {
                    self.write_value(graph, child, slots);
                }
            }
            Value::Bytes(buf) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8u32(BUFFER, buf.data.len() as u32);
                self.writer.u32(buf.max_byte_length);
                self.writer.buf(&buf.data);
            }
            Value::View(view) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8(VIEW);
                self.writer.u32(view.byte_offset);
                self.writer.u32(view.length);
                self.write_text(view.kind.name(), slots);
                self.write_value(graph, view.buffer, slots);
            }
            Value::Date(ms) => {
                let ms = *ms;
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8(DATE);
                self.write_number(ms);
            }
            Value::Error(e) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8(ERROR);
                self.write_text(&e.name, slots);
                self.write_text(&e.message, slots);
                self.write_text(&e.stack, slots);
            }
            Value::Pattern(p) => {
                if self.note_slot(id, slots) {
                    return;
                }
                self.writer.u8(PATTERN);
                self.write_text(&p.source, slots);
                self.write_text(&p.flags, slots);
            }
        }
    }

    /// Writes a text value, interned by content: the first occurrence writes
    /// the payload, every repeat writes a back-reference.
    fn write_text(&mut self, s: &str, slots: &mut Slots) {
        if let Some(&offset) = slots.by_text.get(s) {
            self.writer.u8u32(BACKREF, offset);
            return;
        }
        slots.by_text.insert(s.to_string(), self.offset());
        let units = s.encode_utf16().count();
        self.writer.u8u32(STR, units as u32);
        self.writer.utf16(s);
    }

    /// Writes a double, dispatching on its bit-level identity so that NaN,
    /// the infinities, and both zeros survive a roundtrip as themselves.
    fn write_number(&mut self, f: f64) {
        if f.is_nan() {
            self.writer.u8(NAN);
        } else if f == f64::INFINITY {
            self.writer.u8(POS_INFINITY);
        } else if f == f64::NEG_INFINITY {
            self.writer.u8(NEG_INFINITY);
        } else if f == 0.0 {
            self.writer
                .u8(if f.is_sign_negative() { NEG_ZERO } else { POS_ZERO });
        } else {
            self.writer.u8f64(FLOAT64, f);
        }
    }
}
