//! Wire format of the compositor frame-timing log.
//!
//! A log is a concatenation of frames, each one `varint(len)` followed by `len` bytes of a
//! field-tagged record. The record is a oneof whose field number selects the record kind.

pub mod frame;
pub mod schema;
pub mod varint;
pub mod wire;
pub mod writer;

pub use frame::{Frame, FrameBounds, FrameError, Frames, next_frame};
pub use schema::{
    FrameRecord, GpuInfo, MalformedRecord, PresentInfo, RecordDecode, RecordKind, SchemaVersion,
    SessionFrame, SystemFrame, UsedMarker, VersionMarker, decode_record,
};
pub use varint::VarintError;
pub use writer::LogWriter;
