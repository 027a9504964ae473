//! typed records and the per-layout decode rules that produce them

use prost::Message;

use crate::{
    varint::{self, VarintError},
    wire::{legacy, v1, wire_type},
};

pub use crate::wire::v1::{
    SessionFrame, SystemPresentInfo as PresentInfo, Used as UsedMarker, Version as VersionMarker,
};

/// Compositor frame marker. Only `frame_id` exists in the legacy layout; the rest stays zero there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemFrame {
    pub frame_id: i64,
    pub predicted_display_time_ns: u64,
    pub predicted_display_period_ns: u64,
    pub desired_present_time_ns: u64,
    pub wake_up_time_ns: u64,
    pub present_slop_ns: u64,
}
impl From<v1::SystemFrame> for SystemFrame {
    fn from(f: v1::SystemFrame) -> Self {
        Self {
            frame_id: f.frame_id,
            predicted_display_time_ns: f.predicted_display_time_ns,
            predicted_display_period_ns: f.predicted_display_period_ns,
            desired_present_time_ns: f.desired_present_time_ns,
            wake_up_time_ns: f.wake_up_time_ns,
            present_slop_ns: f.present_slop_ns,
        }
    }
}
impl From<legacy::SystemFrame> for SystemFrame {
    fn from(f: legacy::SystemFrame) -> Self {
        Self {
            frame_id: f.frame_id,
            ..Self::default()
        }
    }
}

/// One GPU work interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuInfo {
    /// absent in the legacy layout
    pub frame_id: Option<i64>,
    pub gpu_start_ns: u64,
    pub gpu_end_ns: u64,
    pub when_ns: Option<u64>,
}
impl From<v1::SystemGpuInfo> for GpuInfo {
    fn from(g: v1::SystemGpuInfo) -> Self {
        Self {
            frame_id: Some(g.frame_id),
            gpu_start_ns: g.start_gpu_ns,
            gpu_end_ns: g.end_gpu_ns,
            when_ns: Some(g.when_ns),
        }
    }
}
impl From<legacy::SystemGpuInfo> for GpuInfo {
    fn from(g: legacy::SystemGpuInfo) -> Self {
        Self {
            frame_id: None,
            gpu_start_ns: g.gpu_start_ns,
            gpu_end_ns: g.gpu_end_ns,
            when_ns: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRecord {
    Version(VersionMarker),
    SessionFrame(SessionFrame),
    SystemFrame(SystemFrame),
    SystemGpuInfo(GpuInfo),
    SystemPresentInfo(PresentInfo),
    Used(UsedMarker),
}
impl FrameRecord {
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Version(_) => RecordKind::Version,
            Self::SessionFrame(_) => RecordKind::SessionFrame,
            Self::SystemFrame(_) => RecordKind::SystemFrame,
            Self::SystemGpuInfo(_) => RecordKind::SystemGpuInfo,
            Self::SystemPresentInfo(_) => RecordKind::SystemPresentInfo,
            Self::Used(_) => RecordKind::Used,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Version,
    SessionFrame,
    SystemFrame,
    SystemGpuInfo,
    SystemPresentInfo,
    Used,
}
impl RecordKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::SessionFrame => "session_frame",
            Self::SystemFrame => "system_frame",
            Self::SystemGpuInfo => "system_gpu_info",
            Self::SystemPresentInfo => "system_present_info",
            Self::Used => "used",
        }
    }
}
impl core::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Field layout used to decode record payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// header-less logs from before version records
    Legacy,
    V1,
}
impl SchemaVersion {
    /// layout announced by a version record, if supported
    pub const fn for_major(major: u32) -> Option<Self> {
        match major {
            1 => Some(Self::V1),
            _ => None,
        }
    }

    pub const fn kind_for_tag(self, tag: u32) -> Option<RecordKind> {
        match self {
            Self::V1 => match tag {
                v1::tag::VERSION => Some(RecordKind::Version),
                v1::tag::SESSION_FRAME => Some(RecordKind::SessionFrame),
                v1::tag::USED => Some(RecordKind::Used),
                v1::tag::SYSTEM_FRAME => Some(RecordKind::SystemFrame),
                v1::tag::SYSTEM_GPU_INFO => Some(RecordKind::SystemGpuInfo),
                v1::tag::SYSTEM_PRESENT_INFO => Some(RecordKind::SystemPresentInfo),
                _ => None,
            },
            Self::Legacy => match tag {
                legacy::tag::SESSION_FRAME => Some(RecordKind::SessionFrame),
                legacy::tag::SYSTEM_FRAME => Some(RecordKind::SystemFrame),
                legacy::tag::SYSTEM_GPU_INFO => Some(RecordKind::SystemGpuInfo),
                _ => None,
            },
        }
    }

    fn decode_body(self, kind: RecordKind, body: &[u8]) -> Result<FrameRecord, MalformedRecord> {
        let malformed = |source: prost::DecodeError| MalformedRecord::Body { kind, source };

        Ok(match (self, kind) {
            (Self::V1, RecordKind::Version) => {
                FrameRecord::Version(VersionMarker::decode(body).map_err(malformed)?)
            }
            (_, RecordKind::SessionFrame) => {
                FrameRecord::SessionFrame(SessionFrame::decode(body).map_err(malformed)?)
            }
            (Self::V1, RecordKind::Used) => {
                FrameRecord::Used(UsedMarker::decode(body).map_err(malformed)?)
            }
            (Self::V1, RecordKind::SystemFrame) => FrameRecord::SystemFrame(
                v1::SystemFrame::decode(body).map_err(malformed)?.into(),
            ),
            (Self::Legacy, RecordKind::SystemFrame) => FrameRecord::SystemFrame(
                legacy::SystemFrame::decode(body).map_err(malformed)?.into(),
            ),
            (Self::V1, RecordKind::SystemGpuInfo) => FrameRecord::SystemGpuInfo(
                v1::SystemGpuInfo::decode(body).map_err(malformed)?.into(),
            ),
            (Self::Legacy, RecordKind::SystemGpuInfo) => FrameRecord::SystemGpuInfo(
                legacy::SystemGpuInfo::decode(body).map_err(malformed)?.into(),
            ),
            (Self::V1, RecordKind::SystemPresentInfo) => {
                FrameRecord::SystemPresentInfo(PresentInfo::decode(body).map_err(malformed)?)
            }
            (
                Self::Legacy,
                RecordKind::Version | RecordKind::Used | RecordKind::SystemPresentInfo,
            ) => return Err(MalformedRecord::NotInLayout { kind, schema: self }),
        })
    }
}
impl core::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::V1 => "v1",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MalformedRecord {
    #[error("record carries no discriminant")]
    Empty,
    #[error("invalid field key: {0}")]
    Key(VarintError),
    #[error("field number 0 is reserved")]
    ZeroField,
    #[error("field {field} uses unsupported wire type {wire_type}")]
    WireType { field: u32, wire_type: u8 },
    #[error("field {field} overruns the record")]
    Overrun { field: u32 },
    #[error("{kind} record is not length-delimited")]
    NotAMessage { kind: RecordKind },
    #[error("{kind} record does not exist in the {schema} layout")]
    NotInLayout { kind: RecordKind, schema: SchemaVersion },
    #[error("{kind} body: {source}")]
    Body {
        kind: RecordKind,
        #[source]
        source: prost::DecodeError,
    },
}
impl MalformedRecord {
    /// Record kind the discriminant resolved to, when the failure happened after resolving it.
    pub const fn kind(&self) -> Option<RecordKind> {
        match self {
            Self::NotAMessage { kind }
            | Self::NotInLayout { kind, .. }
            | Self::Body { kind, .. } => Some(*kind),
            Self::Empty
            | Self::Key(_)
            | Self::ZeroField
            | Self::WireType { .. }
            | Self::Overrun { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub number: u32,
    pub value: FieldValue<'a>,
}

/// Walks the tagged fields of one record payload.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}
impl<'a> FieldReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    fn take(&mut self, field: u32, len: usize) -> Result<&'a [u8], MalformedRecord> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&e| e <= self.buf.len())
            .ok_or(MalformedRecord::Overrun { field })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;

        Ok(bytes)
    }

    fn read_field(&mut self) -> Result<Field<'a>, MalformedRecord> {
        let (key, n) = varint::decode(self.buf, self.pos).map_err(MalformedRecord::Key)?;
        self.pos += n;

        let number =
            u32::try_from(key >> 3).map_err(|_| MalformedRecord::Key(VarintError::Overlong))?;
        let wt = (key & 0x07) as u8;
        if number == 0 {
            return Err(MalformedRecord::ZeroField);
        }

        let value = match wt {
            wire_type::VARINT => {
                let (v, n) = varint::decode(self.buf, self.pos)
                    .map_err(|_| MalformedRecord::Overrun { field: number })?;
                self.pos += n;
                FieldValue::Varint(v)
            }
            wire_type::FIXED64 => {
                let b = self.take(number, 8)?;
                FieldValue::Fixed64(u64::from_le_bytes(b.try_into().unwrap_or_default()))
            }
            wire_type::LENGTH_DELIMITED => {
                let (len, n) = varint::decode(self.buf, self.pos)
                    .map_err(|_| MalformedRecord::Overrun { field: number })?;
                self.pos += n;
                let len =
                    usize::try_from(len).map_err(|_| MalformedRecord::Overrun { field: number })?;
                FieldValue::Bytes(self.take(number, len)?)
            }
            wire_type::FIXED32 => {
                let b = self.take(number, 4)?;
                FieldValue::Fixed32(u32::from_le_bytes(b.try_into().unwrap_or_default()))
            }
            // groups are deprecated and never emitted for this schema
            _ => {
                return Err(MalformedRecord::WireType {
                    field: number,
                    wire_type: wt,
                });
            }
        };

        Ok(Field { number, value })
    }
}
impl<'a> Iterator for FieldReader<'a> {
    type Item = Result<Field<'a>, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        let r = self.read_field();
        self.failed = r.is_err();
        Some(r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDecode {
    Known(FrameRecord),
    /// discriminant not part of the layout; carries the raw field number
    Unknown { tag: u32 },
}

/// Decodes one framed payload with the given layout.
///
/// The top-level record is a oneof: if several known discriminants are present the last one wins.
/// Unknown fields inside a record body are skipped.
pub fn decode_record(
    payload: &[u8],
    schema: SchemaVersion,
) -> Result<RecordDecode, MalformedRecord> {
    let mut selected = None;
    let mut unknown_tag = None;
    for field in FieldReader::new(payload) {
        let field = field?;
        match schema.kind_for_tag(field.number) {
            Some(kind) => match field.value {
                FieldValue::Bytes(body) => selected = Some((kind, body)),
                _ => return Err(MalformedRecord::NotAMessage { kind }),
            },
            None => unknown_tag = Some(field.number),
        }
    }

    match (selected, unknown_tag) {
        (Some((kind, body)), _) => schema.decode_body(kind, body).map(RecordDecode::Known),
        (None, Some(tag)) => Ok(RecordDecode::Unknown { tag }),
        (None, None) => Err(MalformedRecord::Empty),
    }
}
