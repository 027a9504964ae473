//! length-delimited framing: `varint(len) ++ payload`, repeated until the buffer ends

use crate::varint::{self, VarintError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("length prefix truncated")]
    TruncatedVarint,
    #[error("length prefix does not fit in 64 bits")]
    OverlongVarint,
    #[error("frame declares {declared} payload bytes but only {available} remain")]
    TruncatedFrame { declared: u64, available: usize },
}
impl From<VarintError> for FrameError {
    fn from(e: VarintError) -> Self {
        match e {
            VarintError::Truncated => Self::TruncatedVarint,
            VarintError::Overlong => Self::OverlongVarint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    pub payload_start: usize,
    pub payload_end: usize,
    pub next_offset: usize,
}

/// Delimits the frame at `offset`.
///
/// return: `None` when `offset` is exactly at the end of the buffer
pub fn next_frame(buffer: &[u8], offset: usize) -> Result<Option<FrameBounds>, FrameError> {
    if offset == buffer.len() {
        return Ok(None);
    }

    let (declared, prefix_len) = varint::decode(buffer, offset)?;
    let payload_start = offset + prefix_len;
    let available = buffer.len() - payload_start;
    let len = usize::try_from(declared)
        .ok()
        .filter(|&l| l <= available)
        .ok_or(FrameError::TruncatedFrame {
            declared,
            available,
        })?;

    Ok(Some(FrameBounds {
        payload_start,
        payload_end: payload_start + len,
        next_offset: payload_start + len,
    }))
}

#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// zero-based position of the frame in the stream
    pub index: usize,
    /// byte offset of the length prefix
    pub offset: usize,
    pub payload: &'a [u8],
}

/// Iterates every frame of a buffer.
///
/// Stops after the first error; [`Frames::index`] and [`Frames::offset`] then still point at the
/// frame that failed.
pub struct Frames<'a> {
    buffer: &'a [u8],
    offset: usize,
    index: usize,
    failed: bool,
}
impl<'a> Frames<'a> {
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            index: 0,
            failed: false,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }
}
impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match next_frame(self.buffer, self.offset) {
            Ok(None) => None,
            Ok(Some(b)) => {
                let frame = Frame {
                    index: self.index,
                    offset: self.offset,
                    payload: &self.buffer[b.payload_start..b.payload_end],
                };
                self.index += 1;
                self.offset = b.next_offset;

                Some(Ok(frame))
            }
            Err(e) => {
                self.failed = true;

                Some(Err(e))
            }
        }
    }
}
impl core::iter::FusedIterator for Frames<'_> {}
