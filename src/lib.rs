//! Per-frame latency metrics from a compositor frame-timing log.
//!
//! [`decode_log`] takes the whole log in memory and returns a [`MetricsModel`]: absolute
//! cpu/draw/gpu durations and deadline-relative offsets, in milliseconds, for application session
//! frames and for compositor present timings. [`LogDecoder`] exposes the same with [`DecodeOptions`] and the list
//! of records that were skipped on the way.

mod aggregate;
mod decoder;
mod error;
mod model;
mod options;

pub use aggregate::{Aggregator, diff_ns_to_ms};
pub use decoder::{DecodedLog, LogDecoder, decode_log};
pub use error::{DecodeError, DecodeErrorKind, Diagnostic, DiagnosticKind};
pub use model::{
    AbsoluteSeries, GpuOnlySeries, MetricsModel, PresentRelativeSeries, RelativeSeries,
    SystemMetrics,
};
pub use options::{DecodeOptions, MalformedPolicy};
pub use shared_frame_metrics_proto as proto;
