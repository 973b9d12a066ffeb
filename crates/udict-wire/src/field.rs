use std::fmt;

use bytes::Bytes;

/// Low three bits of a tag: how the value that follows is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireType {
    /// The tag bits for this wire type.
    pub fn bits(self) -> u8 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::Fixed32 => 5,
        }
    }

    /// Parse tag bits. Groups (3, 4) and the reserved values are not supported.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Varint => "varint",
            Self::Fixed64 => "fixed64",
            Self::LengthDelimited => "length-delimited",
            Self::Fixed32 => "fixed32",
        };
        f.write_str(name)
    }
}

/// Decoded payload of a field. Which variant is legal depends only on the
/// wire type: `Int` for varints, `Bytes` for everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Int(u64),
    Bytes(Bytes),
}

/// One tag/value unit. Nothing here knows what a field number means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub number: u64,
    pub wire_type: WireType,
    pub value: FieldValue,
}

impl Field {
    pub fn new(number: u64, wire_type: WireType, value: FieldValue) -> Self {
        Self {
            number,
            wire_type,
            value,
        }
    }

    pub fn varint(number: u64, value: u64) -> Self {
        Self::new(number, WireType::Varint, FieldValue::Int(value))
    }

    pub fn length_delimited(number: u64, value: impl Into<Bytes>) -> Self {
        Self::new(number, WireType::LengthDelimited, FieldValue::Bytes(value.into()))
    }

    pub fn fixed64(number: u64, value: [u8; 8]) -> Self {
        Self::new(
            number,
            WireType::Fixed64,
            FieldValue::Bytes(Bytes::copy_from_slice(&value)),
        )
    }

    pub fn fixed32(number: u64, value: [u8; 4]) -> Self {
        Self::new(
            number,
            WireType::Fixed32,
            FieldValue::Bytes(Bytes::copy_from_slice(&value)),
        )
    }

    /// True if this field has the given number and wire type.
    pub fn is(&self, number: u64, wire_type: WireType) -> bool {
        self.number == number && self.wire_type == wire_type
    }

    pub fn as_u64(&self) -> Option<u64> {
        match &self.value {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.value {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::Int(_) => None,
        }
    }

    /// Consume the field, yielding its byte payload if it has one.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self.value {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::Int(_) => None,
        }
    }
}
