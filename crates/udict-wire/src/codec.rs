use bytes::Bytes;

use crate::error::{WireError, WireResult};
use crate::field::{Field, FieldValue, WireType};
use crate::varint::{decode_varint, encode_varint};

/// Largest field number that still fits in a 64-bit tag.
pub const MAX_FIELD_NUMBER: u64 = u64::MAX >> 3;

/// Streaming reader over the top-level fields of a buffer.
///
/// Length-delimited payloads are zero-copy slices of the source buffer, so
/// nested messages can be handed straight to another reader. The iterator
/// stops after the first error.
pub struct FieldReader<'a> {
    buf: &'a Bytes,
    pos: usize,
    failed: bool,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a Bytes) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize, context: &'static str) -> WireResult<Bytes> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(WireError::TruncatedInput {
                offset: self.pos,
                context,
            })?;
        let slice = self.buf.slice(self.pos..end);
        self.pos = end;
        Ok(slice)
    }

    fn read_field(&mut self) -> WireResult<Field> {
        let tag_offset = self.pos;
        let (tag, next) = decode_varint(self.buf, self.pos)?;
        self.pos = next;

        let number = tag >> 3;
        let bits = (tag & 0x7) as u8;
        let wire_type = WireType::from_bits(bits).ok_or(WireError::UnsupportedWireType {
            wire_type: bits,
            offset: tag_offset,
        })?;

        let value = match wire_type {
            WireType::Varint => {
                let (v, next) = decode_varint(self.buf, self.pos)?;
                self.pos = next;
                FieldValue::Int(v)
            }
            WireType::Fixed64 => FieldValue::Bytes(self.take(8, "fixed64 value runs past end of buffer")?),
            WireType::LengthDelimited => {
                let len_offset = self.pos;
                let (len, next) = decode_varint(self.buf, self.pos)?;
                self.pos = next;
                let len = usize::try_from(len).map_err(|_| WireError::TruncatedInput {
                    offset: len_offset,
                    context: "length prefix exceeds address space",
                })?;
                FieldValue::Bytes(self.take(len, "length-delimited payload runs past end of buffer")?)
            }
            WireType::Fixed32 => FieldValue::Bytes(self.take(4, "fixed32 value runs past end of buffer")?),
        };

        Ok(Field::new(number, wire_type, value))
    }
}

impl Iterator for FieldReader<'_> {
    type Item = WireResult<Field>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let result = self.read_field();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Decode every field in `buf`, in order. Fails on the first malformed field.
pub fn decode(buf: &Bytes) -> WireResult<Vec<Field>> {
    FieldReader::new(buf).collect()
}

/// Append one field (tag then value) to `buf`.
pub fn encode_field(buf: &mut Vec<u8>, field: &Field) -> WireResult<()> {
    if field.number > MAX_FIELD_NUMBER {
        return Err(WireError::InvalidValue {
            field: field.number,
            reason: "field number does not fit in a tag".into(),
        });
    }

    match (field.wire_type, &field.value) {
        (WireType::Varint, FieldValue::Int(v)) => {
            encode_tag(buf, field.number, field.wire_type);
            encode_varint(buf, *v);
        }
        (WireType::Fixed64, FieldValue::Bytes(b)) if b.len() == 8 => {
            encode_tag(buf, field.number, field.wire_type);
            buf.extend_from_slice(b);
        }
        (WireType::LengthDelimited, FieldValue::Bytes(b)) => {
            encode_tag(buf, field.number, field.wire_type);
            encode_varint(buf, b.len() as u64);
            buf.extend_from_slice(b);
        }
        (WireType::Fixed32, FieldValue::Bytes(b)) if b.len() == 4 => {
            encode_tag(buf, field.number, field.wire_type);
            buf.extend_from_slice(b);
        }
        (wire_type, value) => {
            let reason = match value {
                FieldValue::Int(_) => format!("{wire_type} field requires a byte value"),
                FieldValue::Bytes(b) => match wire_type {
                    WireType::Fixed64 => format!("fixed64 field requires 8 bytes, got {}", b.len()),
                    WireType::Fixed32 => format!("fixed32 field requires 4 bytes, got {}", b.len()),
                    _ => format!("{wire_type} field requires an integer value"),
                },
            };
            return Err(WireError::InvalidValue {
                field: field.number,
                reason,
            });
        }
    }
    Ok(())
}

/// Encode fields in input order.
pub fn encode(fields: &[Field]) -> WireResult<Vec<u8>> {
    let mut buf = Vec::new();
    for field in fields {
        encode_field(&mut buf, field)?;
    }
    Ok(buf)
}

fn encode_tag(buf: &mut Vec<u8>, number: u64, wire_type: WireType) {
    encode_varint(buf, (number << 3) | u64::from(wire_type.bits()));
}
