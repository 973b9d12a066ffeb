use crate::error::{WireError, WireResult};

/// Longest legal varint: ten 7-bit groups cover 64 bits.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode a u64 as a base-128 varint, least significant group first.
pub fn encode_varint(buf: &mut Vec<u8>, value: u64) {
    let mut rest = value;
    while rest >= 0x80 {
        buf.push(rest as u8 | 0x80);
        rest >>= 7;
    }
    buf.push(rest as u8);
}

/// Decode a varint starting at `start`. Returns (value, offset just past it).
pub fn decode_varint(data: &[u8], start: usize) -> WireResult<(u64, usize)> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let pos = start + i;
        let byte = *data.get(pos).ok_or(WireError::TruncatedInput {
            offset: pos,
            context: "varint runs past end of buffer",
        })?;
        let group = u64::from(byte & 0x7F);
        // Only the lowest bit of the tenth group fits in a u64.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(WireError::VarintOverflow { offset: start });
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, pos + 1));
        }
    }
    Err(WireError::TruncatedInput {
        offset: start,
        context: "varint longer than 10 bytes",
    })
}
