//! Variable-length integer format
//!
//! Values in `-112..=127` take a single byte holding the value itself.
//! Anything else is written as a prefix byte followed by 1 to 8 big-endian
//! payload bytes:
//!
//! ```text
//! prefix -113..=-120  positive, payload length = -112 - prefix
//! prefix -121..=-128  negative, payload length = -120 - prefix,
//!                     payload holds the one's complement of the value
//! ```
//!
//! `vint` and `vlong` share the encoding; `vint` only narrows on read.

/// Smallest value encoded in a single byte
pub const SINGLE_BYTE_MIN: i64 = -112;

/// Largest value encoded in a single byte
pub const SINGLE_BYTE_MAX: i64 = 127;

/// Longest encoding (prefix + 8 payload bytes)
pub const MAX_VLONG_SIZE: usize = 9;

/// Encode `value` into `buf`, returning the number of bytes used
pub fn encode_vlong(value: i64, buf: &mut [u8; MAX_VLONG_SIZE]) -> usize {
    if (SINGLE_BYTE_MIN..=SINGLE_BYTE_MAX).contains(&value) {
        buf[0] = value as u8;
        return 1;
    }

    let (magnitude, base) = if value < 0 { (!value, -120i8) } else { (value, -112i8) };
    let payload = payload_len(magnitude);

    buf[0] = (base - payload as i8) as u8;
    for idx in 0..payload {
        let shift = (payload - 1 - idx) * 8;
        buf[1 + idx] = (magnitude >> shift) as u8;
    }
    1 + payload
}

/// Total encoded length implied by a prefix byte
#[inline]
pub fn decode_vlong_size(prefix: u8) -> usize {
    let first = prefix as i8;
    if first >= -112 {
        1
    } else if first < -120 {
        (-119 - first as i32) as usize
    } else {
        (-111 - first as i32) as usize
    }
}

/// Whether a multi-byte encoding with this prefix holds a negative value
#[inline]
pub fn is_negative_prefix(prefix: u8) -> bool {
    let first = prefix as i8;
    first < -120 || (-112..0).contains(&first)
}

/// Encoded length of `value`
pub fn vlong_size(value: i64) -> usize {
    if (SINGLE_BYTE_MIN..=SINGLE_BYTE_MAX).contains(&value) {
        return 1;
    }
    let magnitude = if value < 0 { !value } else { value };
    1 + payload_len(magnitude)
}

/// Bytes needed to hold a non-negative magnitude
fn payload_len(magnitude: i64) -> usize {
    let bits = 64 - magnitude.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}
