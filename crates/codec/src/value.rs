//! [`Value`] — the universal value union ferried between execution contexts.
//!
//! Values live in a [`ValueGraph`], an arena of slots addressed by
//! [`ValueId`]. Composite variants hold child ids rather than inline values,
//! which is what lets one graph express shared substructure and true cycles:
//! identity is the slot index, and two parents naming the same id share one
//! child. A graph never aliases another graph's slots; codecs build a fresh
//! graph per decode call.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::token::Token;
use crate::view::ViewKind;

/// Identity handle of a value slot inside a [`ValueGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

/// A raw byte buffer plus its growth bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuf {
    pub data: Vec<u8>,
    /// Maximum byte length the buffer may grow to; `0` means fixed-size.
    pub max_byte_length: u32,
}

impl ByteBuf {
    /// A fixed-size buffer.
    pub fn fixed(data: Vec<u8>) -> Self {
        Self {
            data,
            max_byte_length: 0,
        }
    }

    /// A buffer growable in place up to `max_byte_length` bytes.
    pub fn growable(data: Vec<u8>, max_byte_length: u32) -> Self {
        Self {
            data,
            max_byte_length,
        }
    }
}

/// A typed numeric window over a raw buffer value.
///
/// Views never own bytes; `buffer` must reference a [`Value::Bytes`] slot in
/// the same graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewValue {
    pub kind: ViewKind,
    pub buffer: ValueId,
    pub byte_offset: u32,
    /// Element count; `0` derives the count from the backing buffer.
    pub length: u32,
}

/// A captured failure: name, message, and trace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: String,
}

/// A pattern object: source and flags text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternValue {
    pub source: String,
    pub flags: String,
}

/// One slot of a [`ValueGraph`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// Absence; also the decoded form of any unknown tag.
    Undefined,
    Bool(bool),
    /// Any double, including NaN, the infinities, and both zeros — the codec
    /// dispatches on the payload's bit-level identity.
    Float(f64),
    /// 64-bit signed integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt(u64),
    Str(String),
    Token(Token),
    /// Ordered list of children.
    List(Vec<ValueId>),
    /// Keyed record; keys are `Str` or `Token` slots, insertion-ordered.
    Record(Vec<(ValueId, ValueId)>),
    /// Key-value map, insertion-ordered.
    Map(Vec<(ValueId, ValueId)>),
    /// Ordered set of members.
    Set(Vec<ValueId>),
    /// Raw byte buffer.
    Bytes(ByteBuf),
    /// Typed numeric view over a `Bytes` slot.
    View(ViewValue),
    /// Point-in-time stamp, milliseconds since the epoch.
    Date(f64),
    /// Captured failure.
    Error(ErrorValue),
    /// Pattern object.
    Pattern(PatternValue),
}

/// Slot arena holding one graph of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueGraph {
    nodes: Vec<Value>,
}

impl ValueGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocates a new slot and returns its identity.
    pub fn alloc(&mut self, value: Value) -> ValueId {
        let id = ValueId(self.nodes.len() as u32);
        self.nodes.push(value);
        id
    }

    /// Borrows the slot behind `id`. The id must belong to this graph.
    pub fn node(&self, id: ValueId) -> &Value {
        &self.nodes[id.0 as usize]
    }

    /// Mutably borrows the slot behind `id`. The id must belong to this graph.
    pub fn node_mut(&mut self, id: ValueId) -> &mut Value {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maps a host JSON value into the graph and returns its root id.
    ///
    /// This is the conversion boundary at the system's edge: unsigned
    /// integers above `i64::MAX` become [`Value::UInt`], everything else maps
    /// one-to-one. JSON cannot express the non-tree kinds, so the result is
    /// always acyclic.
    pub fn insert_json(&mut self, value: &serde_json::Value) -> ValueId {
        match value {
            serde_json::Value::Null => self.alloc(Value::Null),
            serde_json::Value::Bool(b) => self.alloc(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    self.alloc(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    self.alloc(Value::UInt(u))
                } else {
                    self.alloc(Value::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => self.alloc(Value::Str(s.clone())),
            serde_json::Value::Array(arr) => {
                let items: Vec<ValueId> = arr.iter().map(|v| self.insert_json(v)).collect();
                self.alloc(Value::List(items))
            }
            serde_json::Value::Object(obj) => {
                let pairs: Vec<(ValueId, ValueId)> = obj
                    .iter()
                    .map(|(k, v)| {
                        let key = self.alloc(Value::Str(k.clone()));
                        let val = self.insert_json(v);
                        (key, val)
                    })
                    .collect();
                self.alloc(Value::Record(pairs))
            }
        }
    }

    /// Renders the value behind `id` as host JSON.
    ///
    /// Lossy by design: non-finite doubles become null (JSON has no spelling
    /// for them), bytes become a base64 data URI, tokens render as their
    /// sigil-prefixed name, maps and sets render as arrays, and a slot
    /// revisited along the current path (a cycle) renders as null.
    pub fn to_json(&self, id: ValueId) -> serde_json::Value {
        self.to_json_guarded(id, &mut HashSet::new())
    }

    fn to_json_guarded(&self, id: ValueId, path: &mut HashSet<u32>) -> serde_json::Value {
        match self.node(id) {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Int(i) => serde_json::json!(i),
            Value::UInt(u) => serde_json::json!(u),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Token(t) => serde_json::Value::String(t.name()),
            Value::Bytes(b) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                BASE64.encode(&b.data)
            )),
            Value::Date(ms) => serde_json::json!(ms),
            Value::Error(e) => serde_json::json!({
                "name": e.name,
                "message": e.message,
                "stack": e.stack,
            }),
            Value::Pattern(p) => serde_json::json!({
                "source": p.source,
                "flags": p.flags,
            }),
            Value::List(items) | Value::Set(items) => {
                if !path.insert(id.0) {
                    return serde_json::Value::Null;
                }
                let arr = items
                    .iter()
                    .map(|&child| self.to_json_guarded(child, path))
                    .collect();
                path.remove(&id.0);
                serde_json::Value::Array(arr)
            }
            Value::Record(pairs) => {
                if !path.insert(id.0) {
                    return serde_json::Value::Null;
                }
                let mut obj = serde_json::Map::new();
                for &(key, val) in pairs {
                    let key = match self.node(key) {
                        Value::Str(s) => s.clone(),
                        Value::Token(t) => t.name(),
                        _ => continue,
                    };
                    obj.insert(key, self.to_json_guarded(val, path));
                }
                path.remove(&id.0);
                serde_json::Value::Object(obj)
            }
            Value::Map(pairs) => {
                if !path.insert(id.0) {
                    return serde_json::Value::Null;
                }
                let arr = pairs
                    .iter()
                    .map(|&(key, val)| {
                        serde_json::Value::Array(vec![
                            self.to_json_guarded(key, path),
                            self.to_json_guarded(val, path),
                        ])
                    })
                    .collect();
                path.remove(&id.0);
                serde_json::Value::Array(arr)
            }
            Value::View(view) => {
                if !path.insert(id.0) {
                    return serde_json::Value::Null;
                }
                let buffer = self.to_json_guarded(view.buffer, path);
                path.remove(&id.0);
                serde_json::json!({
                    "view": view.kind.name(),
                    "byteOffset": view.byte_offset,
                    "length": view.length,
                    "buffer": buffer,
                })
            }
        }
    }
}

/// Structural equality between two graph values, possibly from different
/// graphs.
///
/// Unlike `==` on floats, NaN compares equal to NaN and the two zeros are
/// distinct (bit-level identity). Cycles terminate: a pair of slots already
/// under comparison is assumed equal.
pub fn deep_eq(a_graph: &ValueGraph, a: ValueId, b_graph: &ValueGraph, b: ValueId) -> bool {
    deep_eq_guarded(a_graph, a, b_graph, b, &mut HashSet::new())
}

fn deep_eq_guarded(
    a_graph: &ValueGraph,
    a: ValueId,
    b_graph: &ValueGraph,
    b: ValueId,
    visited: &mut HashSet<(u32, u32)>,
) -> bool {
    if !visited.insert((a.0, b.0)) {
        return true;
    }
    let eq_children = |xs: &[ValueId], ys: &[ValueId], visited: &mut HashSet<(u32, u32)>| {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys)
                .all(|(&x, &y)| deep_eq_guarded(a_graph, x, b_graph, y, visited))
    };
    let eq_pairs =
        |xs: &[(ValueId, ValueId)], ys: &[(ValueId, ValueId)], visited: &mut HashSet<(u32, u32)>| {
            xs.len() == ys.len()
                && xs.iter().zip(ys).all(|(&(xk, xv), &(yk, yv))| {
                    deep_eq_guarded(a_graph, xk, b_graph, yk, visited)
                        && deep_eq_guarded(a_graph, xv, b_graph, yv, visited)
                })
        };
    match (a_graph.node(a), b_graph.node(b)) {
        (Value::Null, Value::Null) => true,
        (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::UInt(x), Value::UInt(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Token(x), Value::Token(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => eq_children(xs, ys, visited),
        (Value::Set(xs), Value::Set(ys)) => eq_children(xs, ys, visited),
        (Value::Record(xs), Value::Record(ys)) => eq_pairs(xs, ys, visited),
        (Value::Map(xs), Value::Map(ys)) => eq_pairs(xs, ys, visited),
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::View(x), Value::View(y)) => {
            x.kind == y.kind
                && x.byte_offset == y.byte_offset
                && x.length == y.length
                && deep_eq_guarded(a_graph, x.buffer, b_graph, y.buffer, visited)
        }
        (Value::Date(x), Value::Date(y)) => x.to_bits() == y.to_bits(),
        (Value::Error(x), Value::Error(y)) => x == y,
        (Value::Pattern(x), Value::Pattern(y)) => x == y,
        _ => false,
    }
}
