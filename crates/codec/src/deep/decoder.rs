//! `DeepDecoder` — tag-dispatch decoder for the deep wire format.
//!
//! Reconstructs a fresh value graph from a flat byte sequence, resolving
//! back-references so shared and cyclic structure comes back as shared
//! slots, not copies.

use std::collections::HashMap;

use ferry_buffers::{Reader, Region};

use super::constants::*;
use super::error::DeepError;
use crate::token::Token;
use crate::value::{ByteBuf, ErrorValue, PatternValue, Value, ValueGraph, ValueId, ViewValue};
use crate::view::ViewKind;

/// Decoder for the deep wire format.
///
/// The offset-keyed back-reference table is created per [`decode`] call and
/// discarded afterward; concurrent decodes never share state.
///
/// [`decode`]: DeepDecoder::decode
#[derive(Default)]
pub struct DeepDecoder;

impl DeepDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes one value from `input`, returning the freshly built graph and
    /// the root slot.
    pub fn decode(&mut self, input: &[u8]) -> Result<(ValueGraph, ValueId), DeepError> {
        let mut reader = Reader::new(input);
        let mut graph = ValueGraph::new();
        let mut slots = HashMap::new();
        let root = read_value(&mut reader, &mut graph, &mut slots)?;
        Ok((graph, root))
    }

    /// Decodes from `length` bytes of a backing region starting at
    /// `byte_offset`. Reads never cross the declared window.
    pub fn decode_region(
        &mut self,
        region: &Region,
        byte_offset: usize,
        length: usize,
    ) -> Result<(ValueGraph, ValueId), DeepError> {
        let end = byte_offset + length;
        if end > region.len() {
            return Err(DeepError::UnexpectedEof);
        }
        self.decode(&region.as_slice()[byte_offset..end])
    }
}

/// Reads one value at the reader's cursor.
///
/// Slot-eligible kinds are recorded in the table at their tag offset before
/// their children are decoded, mirroring the encoder's ordering, so an
/// embedded back-reference to the value being built resolves to the
/// in-progress slot instead of recursing forever.
fn read_value(
    reader: &mut Reader<'_>,
    graph: &mut ValueGraph,
    slots: &mut HashMap<u32, ValueId>,
) -> Result<ValueId, DeepError> {
    let tag_offset = reader.x as u32;
    let tag = reader.try_u8()?;
    match tag {
        FALSE => Ok(graph.alloc(Value::Bool(false))),
        TRUE => Ok(graph.alloc(Value::Bool(true))),
        NULL => Ok(graph.alloc(Value::Null)),
        UNDEFINED => Ok(graph.alloc(Value::Undefined)),
        NAN => Ok(graph.alloc(Value::Float(f64::NAN))),
        POS_INFINITY => Ok(graph.alloc(Value::Float(f64::INFINITY))),
        NEG_INFINITY => Ok(graph.alloc(Value::Float(f64::NEG_INFINITY))),
        POS_ZERO => Ok(graph.alloc(Value::Float(0.0))),
        NEG_ZERO => Ok(graph.alloc(Value::Float(-0.0))),
        FLOAT64 => {
            let f = reader.try_f64()?;
            Ok(graph.alloc(Value::Float(f)))
        }
        INT64 => {
            let i = reader.try_i64()?;
            Ok(graph.alloc(Value::Int(i)))
        }
        UINT64 => {
            let u = reader.try_u64()?;
            Ok(graph.alloc(Value::UInt(u)))
        }
        STR => {
            let units = reader.try_u32()? as usize;
            let s = reader.try_utf16(units)?;
            let id = graph.alloc(Value::Str(s));
            slots.insert(tag_offset, id);
            Ok(id)
        }
        TOKEN => {
            let name = read_text(reader, graph, slots)?;
            Ok(graph.alloc(Value::Token(Token::from_name(&name))))
        }
        LIST => {
            let count = reader.try_u32()? as usize;
            let id = graph.alloc(Value::List(Vec::with_capacity(count)));
            slots.insert(tag_offset, id);
            for _ in 0..count {
                let child = read_value(reader, graph, slots)?;
                if let Value::List(items) = graph.node_mut(id) {
                    items.push(child);
                }
            }
            Ok(id)
        }
        RECORD => {
            let count = reader.try_u32()? as usize;
            let id = graph.alloc(Value::Record(Vec::with_capacity(count)));
            slots.insert(tag_offset, id);
            for _ in 0..count {
                let key = read_value(reader, graph, slots)?;
                let val = read_value(reader, graph, slots)?;
                if let Value::Record(pairs) = graph.node_mut(id) {
                    pairs.push((key, val));
                }
            }
            Ok(id)
        }
        MAP => {
            let count = reader.try_u32()? as usize;
            let id = graph.alloc(Value::Map(Vec::with_capacity(count)));
            slots.insert(tag_offset, id);
            for _ in 0..count {
                let key = read_value(reader, graph, slots)?;
                let val = read_value(reader, graph, slots)?;
                if let Value::Map(pairs) = graph.node_mut(id) {
                    pairs.push((key, val));
                }
            }
            Ok(id)
        }
        SET => {
            let count = reader.try_u32()? as usize;
            let id = graph.alloc(Value::Set(Vec::with_capacity(count)));
            slots.insert(tag_offset, id);
            for _ in 0..count {
                let child = read_value(reader, graph, slots)?;
                if let Value::Set(items) = graph.node_mut(id) {
                    items.push(child);
                }
            }
            Ok(id)
        }
        BUFFER => {
            let length = reader.try_u32()? as usize;
            let max_byte_length = reader.try_u32()?;
            let data = reader.try_buf(length)?.to_vec();
            let id = graph.alloc(Value::Bytes(ByteBuf {
                data,
                max_byte_length,
            }));
            slots.insert(tag_offset, id);
            Ok(id)
        }
        VIEW => {
            let byte_offset = reader.try_u32()?;
            let length = reader.try_u32()?;
            let id = graph.alloc(Value::Undefined);
            slots.insert(tag_offset, id);
            let name = read_text(reader, graph, slots)?;
            let kind =
                ViewKind::from_name(&name).ok_or(DeepError::UnknownViewKind(name))?;
            let buffer = read_value(reader, graph, slots)?;
            if !matches!(graph.node(buffer), Value::Bytes(_)) {
                return Err(DeepError::Malformed);
            }
            *graph.node_mut(id) = Value::View(ViewValue {
                kind,
                buffer,
                byte_offset,
                length,
            });
            Ok(id)
        }
        DATE => {
            let id = graph.alloc(Value::Undefined);
            slots.insert(tag_offset, id);
            let child = read_value(reader, graph, slots)?;
            let ms = match graph.node(child) {
                Value::Float(f) => *f,
                Value::Int(i) => *i as f64,
                Value::UInt(u) => *u as f64,
                _ => return Err(DeepError::Malformed),
            };
            *graph.node_mut(id) = Value::Date(ms);
            Ok(id)
        }
        ERROR => {
            let id = graph.alloc(Value::Undefined);
            slots.insert(tag_offset, id);
            let name = read_text(reader, graph, slots)?;
            let message = read_text(reader, graph, slots)?;
            let stack = read_text(reader, graph, slots)?;
            *graph.node_mut(id) = Value::Error(ErrorValue {
                name,
                message,
                stack,
            });
            Ok(id)
        }
        PATTERN => {
            let id = graph.alloc(Value::Undefined);
            slots.insert(tag_offset, id);
            let source = read_text(reader, graph, slots)?;
            let flags = read_text(reader, graph, slots)?;
            *graph.node_mut(id) = Value::Pattern(PatternValue { source, flags });
            Ok(id)
        }
        BACKREF => {
            let offset = reader.try_u32()?;
            slots
                .get(&offset)
                .copied()
                .ok_or(DeepError::UnresolvedBackRef(offset))
        }
        // Unknown tags decode as absence, mirroring the encode-side downgrade
        // of values with no representable kind.
        _ => Ok(graph.alloc(Value::Undefined)),
    }
}

/// Reads a child value that must be text — either an inline string or a
/// back-reference to one — and returns its content.
fn read_text(
    reader: &mut Reader<'_>,
    graph: &mut ValueGraph,
    slots: &mut HashMap<u32, ValueId>,
) -> Result<String, DeepError> {
    let id = read_value(reader, graph, slots)?;
    match graph.node(id) {
        Value::Str(s) => Ok(s.clone()),
        _ => Err(DeepError::Malformed),
    }
}
