//! `EnvelopeEncoder` — writes one tagged value into a backing region.

use ferry_buffers::Region;

use super::constants::*;
use super::error::EnvelopeError;
use super::types::{Direct, Envelope, EnvelopeOptions, ViewEnvelope};
use crate::deep::DeepEncoder;
use crate::value::ByteBuf;

/// Encoder for the envelope format.
///
/// Writes exactly one envelope at `options.byte_offset`, asking the region
/// to grow in place before every write, and returns the number of bytes
/// written. Growth failure propagates; nothing is retried or partially
/// flushed.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeEncoder {
    pub options: EnvelopeOptions,
}

impl EnvelopeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EnvelopeOptions) -> Self {
        Self { options }
    }

    /// Encodes `value` into `region`. Returns bytes written.
    pub fn encode(&mut self, value: &Envelope, region: &mut Region) -> Result<usize, EnvelopeError> {
        let offset = self.options.byte_offset;
        match value {
            Envelope::Buffer(buf) => write_buffer(buf, region, offset),
            Envelope::View(view) => write_view(view, region, offset),
            Envelope::Remote { tag, id } => {
                region.ensure(offset + 5)?;
                let bytes = region.as_mut_slice();
                bytes[offset] = *tag;
                bytes[offset + 1..offset + 5].copy_from_slice(&id.to_le_bytes());
                Ok(5)
            }
            Envelope::Direct(Direct::Bytes(data)) => write_direct(data, region, offset),
            Envelope::Direct(Direct::Value(graph, root)) => {
                if self.options.direct {
                    let mut deep = DeepEncoder::new();
                    let data = deep.encode(graph, *root);
                    write_direct(&data, region, offset)
                } else {
                    // No transform agreed on — the payload falls back to the
                    // escaped-text channel.
                    let text = graph.to_json(*root).to_string();
                    write_text(TEXT, &text, region, offset)
                }
            }
            Envelope::Error(e) => {
                let text = serde_json::json!({
                    "name": e.name,
                    "message": e.message,
                    "stack": e.stack,
                })
                .to_string();
                write_text(ERROR, &text, region, offset)
            }
            Envelope::Json(value) => write_text(TEXT, &value.to_string(), region, offset),
            Envelope::Undefined => write_text(TEXT, "", region, offset),
        }
    }
}

/// Writes the five-byte tag+length header, growing the region to hold
/// `payload` more bytes past it.
fn init(
    region: &mut Region,
    offset: usize,
    tag: u8,
    length: u32,
    payload: usize,
) -> Result<(), EnvelopeError> {
    region.ensure(offset + payload + 5)?;
    let bytes = region.as_mut_slice();
    bytes[offset] = tag;
    bytes[offset + 1..offset + 5].copy_from_slice(&length.to_le_bytes());
    Ok(())
}

fn write_buffer(buf: &ByteBuf, region: &mut Region, offset: usize) -> Result<usize, EnvelopeError> {
    let length = buf.data.len();
    init(region, offset, BUFFER, length as u32, length + 4)?;
    let bytes = region.as_mut_slice();
    bytes[offset + 5..offset + 9].copy_from_slice(&buf.max_byte_length.to_le_bytes());
    bytes[offset + 9..offset + 9 + length].copy_from_slice(&buf.data);
    Ok(length + 9)
}

fn write_view(
    view: &ViewEnvelope,
    region: &mut Region,
    offset: usize,
) -> Result<usize, EnvelopeError> {
    let units: Vec<u16> = view.kind.name().encode_utf16().collect();
    let utf16_length = units.len() * 2;
    init(region, offset, VIEW, units.len() as u32, utf16_length + 8)?;
    {
        let bytes = region.as_mut_slice();
        bytes[offset + 5..offset + 9].copy_from_slice(&view.byte_offset.to_le_bytes());
        bytes[offset + 9..offset + 13].copy_from_slice(&view.length.to_le_bytes());
        let mut pos = offset + 13;
        for unit in units {
            bytes[pos..pos + 2].copy_from_slice(&unit.to_le_bytes());
            pos += 2;
        }
    }
    let nested = write_buffer(&view.buffer, region, offset + 13 + utf16_length)?;
    Ok(13 + utf16_length + nested)
}

fn write_text(
    tag: u8,
    text: &str,
    region: &mut Region,
    offset: usize,
) -> Result<usize, EnvelopeError> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let double = units.len() * 2;
    init(region, offset, tag, units.len() as u32, double)?;
    let bytes = region.as_mut_slice();
    let mut pos = offset + 5;
    for unit in units {
        bytes[pos..pos + 2].copy_from_slice(&unit.to_le_bytes());
        pos += 2;
    }
    Ok(double + 5)
}

fn write_direct(data: &[u8], region: &mut Region, offset: usize) -> Result<usize, EnvelopeError> {
    let length = data.len();
    init(region, offset, DIRECT, length as u32, length)?;
    region.as_mut_slice()[offset + 5..offset + 5 + length].copy_from_slice(data);
    Ok(length + 5)
}
