//! unsigned base-128 varints (little-endian 7bit groups, msb = continuation)

/// a u64 never needs more than this many groups
pub const MAX_ENCODED_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarintError {
    #[error("buffer ended before the terminating byte of a varint")]
    Truncated,
    #[error("varint does not fit in 64 bits")]
    Overlong,
}

/// Decodes a varint starting at `offset`.
///
/// return: (value, bytes consumed)
pub fn decode(buffer: &[u8], offset: usize) -> Result<(u64, usize), VarintError> {
    let bytes = buffer.get(offset..).unwrap_or_default();

    let mut value = 0u64;
    for (n, &b) in bytes.iter().enumerate() {
        // 10th group may only carry the top bit of a u64
        if n == MAX_ENCODED_LEN - 1 && b > 1 {
            return Err(VarintError::Overlong);
        }

        value |= u64::from(b & 0x7f) << (7 * n);
        if b & 0x80 == 0 {
            return Ok((value, n + 1));
        }
    }

    Err(VarintError::Truncated)
}

/// Appends the encoded form of `value` to `sink`, returning the number of bytes written.
pub fn encode(mut value: u64, sink: &mut Vec<u8>) -> usize {
    let mut written = 0;
    loop {
        written += 1;
        if value < 0x80 {
            sink.push(value as u8);
            return written;
        }

        sink.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
}

#[inline]
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 { 1 } else { bits.div_ceil(7) }
}
