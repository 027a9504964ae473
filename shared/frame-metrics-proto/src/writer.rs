//! producer side: frames records into a byte sink

use std::io::{IoSlice, Write};

use prost::Message;

use crate::{
    varint,
    wire::{v1, wire_type},
};

#[inline(always)]
fn writeva(w: &mut (impl Write + ?Sized), mut iov: &mut [IoSlice]) -> std::io::Result<()> {
    // strip empty heads
    IoSlice::advance_slices(&mut iov, 0);

    while !iov.is_empty() {
        let b = w.write_vectored(iov)?;
        if b == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "no write",
            ));
        }
        IoSlice::advance_slices(&mut iov, b);
    }

    Ok(())
}

/// Writes `varint(len) ++ payload` frames carrying v1 records.
pub struct LogWriter<W: Write> {
    inner: W,
    payload: Vec<u8>,
    head: Vec<u8>,
}
impl<W: Write> LogWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            payload: Vec::new(),
            head: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes a frame with an arbitrary payload, bypassing the record encoding.
    pub fn write_frame(&mut self, payload: &[u8]) -> std::io::Result<()> {
        self.head.clear();
        varint::encode(payload.len() as u64, &mut self.head);

        writeva(
            &mut self.inner,
            &mut [IoSlice::new(&self.head), IoSlice::new(payload)],
        )
    }

    /// Writes a record whose discriminant is `tag` and body is `body`.
    pub fn write_raw(&mut self, tag: u32, body: &[u8]) -> std::io::Result<()> {
        let mut payload = core::mem::take(&mut self.payload);
        payload.clear();
        varint::encode(
            u64::from(tag) << 3 | u64::from(wire_type::LENGTH_DELIMITED),
            &mut payload,
        );
        varint::encode(body.len() as u64, &mut payload);
        payload.extend_from_slice(body);

        let r = self.write_frame(&payload);
        self.payload = payload;

        r
    }

    #[inline]
    pub fn write_message(&mut self, tag: u32, body: &impl Message) -> std::io::Result<()> {
        self.write_raw(tag, &body.encode_to_vec())
    }

    #[inline]
    pub fn write_version(&mut self, major: u32, minor: u32) -> std::io::Result<()> {
        self.write_message(v1::tag::VERSION, &v1::Version { major, minor })
    }

    #[inline]
    pub fn write_session_frame(&mut self, f: &v1::SessionFrame) -> std::io::Result<()> {
        self.write_message(v1::tag::SESSION_FRAME, f)
    }

    #[inline]
    pub fn write_used(&mut self, u: &v1::Used) -> std::io::Result<()> {
        self.write_message(v1::tag::USED, u)
    }

    #[inline]
    pub fn write_system_frame(&mut self, f: &v1::SystemFrame) -> std::io::Result<()> {
        self.write_message(v1::tag::SYSTEM_FRAME, f)
    }

    #[inline]
    pub fn write_system_gpu_info(&mut self, g: &v1::SystemGpuInfo) -> std::io::Result<()> {
        self.write_message(v1::tag::SYSTEM_GPU_INFO, g)
    }

    #[inline]
    pub fn write_system_present_info(&mut self, p: &v1::SystemPresentInfo) -> std::io::Result<()> {
        self.write_message(v1::tag::SYSTEM_PRESENT_INFO, p)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
