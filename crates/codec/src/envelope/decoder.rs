//! `EnvelopeDecoder` — reads one tagged value back out of a backing region.

use ferry_buffers::{Reader, Region};

use super::constants::*;
use super::error::EnvelopeError;
use super::types::{Direct, Envelope, EnvelopeOptions, ViewEnvelope};
use crate::deep::DeepDecoder;
use crate::value::{ByteBuf, ErrorValue};
use crate::view::ViewKind;

/// Decoder for the envelope format.
///
/// Reads the tag at `options.byte_offset` and dispatches structurally,
/// mirroring the encode side. Any tag outside the structural set decodes as
/// the small-integer fast path — the generic type+small-integer channel.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeDecoder {
    pub options: EnvelopeOptions,
}

impl EnvelopeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EnvelopeOptions) -> Self {
        Self { options }
    }

    /// Decodes the envelope at `options.byte_offset` of `region`.
    pub fn decode(&mut self, region: &Region) -> Result<Envelope, EnvelopeError> {
        self.decode_slice(region.as_slice())
    }

    /// Decodes from a raw byte slice; reads never cross the slice's end.
    pub fn decode_slice(&mut self, input: &[u8]) -> Result<Envelope, EnvelopeError> {
        let mut reader = Reader::from_slice(input, self.options.byte_offset, input.len());
        let tag = reader.try_u8()?;
        match tag {
            BUFFER => Ok(Envelope::Buffer(read_buffer_body(&mut reader)?)),
            VIEW => {
                let units = reader.try_u32()? as usize;
                let byte_offset = reader.try_u32()?;
                let length = reader.try_u32()?;
                let name = reader.try_utf16(units)?;
                let kind =
                    ViewKind::from_name(&name).ok_or(EnvelopeError::UnknownViewKind(name))?;
                if reader.try_u8()? != BUFFER {
                    return Err(EnvelopeError::InvalidPayload);
                }
                let buffer = read_buffer_body(&mut reader)?;
                Ok(Envelope::View(ViewEnvelope {
                    kind,
                    byte_offset,
                    length,
                    buffer,
                }))
            }
            TEXT => {
                let units = reader.try_u32()? as usize;
                if units == 0 {
                    return Ok(Envelope::Undefined);
                }
                let text = reader.try_utf16(units)?;
                let value = serde_json::from_str(&text)
                    .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
                Ok(Envelope::Json(value))
            }
            DIRECT => {
                let length = reader.try_u32()? as usize;
                let data = reader.try_buf(length)?;
                if self.options.direct {
                    let (graph, root) = DeepDecoder::new().decode(data)?;
                    Ok(Envelope::Direct(Direct::Value(graph, root)))
                } else {
                    Ok(Envelope::Direct(Direct::Bytes(data.to_vec())))
                }
            }
            ERROR => {
                let units = reader.try_u32()? as usize;
                let text = reader.try_utf16(units)?;
                let value: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
                let field = |key: &str| {
                    value
                        .get(key)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string()
                };
                Ok(Envelope::Error(ErrorValue {
                    name: field("name"),
                    message: field("message"),
                    stack: field("stack"),
                }))
            }
            _ => {
                let id = reader.try_i32()?;
                Ok(Envelope::Remote { tag, id })
            }
        }
    }
}

fn read_buffer_body(reader: &mut Reader<'_>) -> Result<ByteBuf, EnvelopeError> {
    let length = reader.try_u32()? as usize;
    let max_byte_length = reader.try_u32()?;
    let data = reader.try_buf(length)?.to_vec();
    Ok(ByteBuf {
        data,
        max_byte_length,
    })
}
