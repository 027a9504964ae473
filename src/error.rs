use shared_frame_metrics_proto::{FrameError, MalformedRecord};

/// Fatal decode failure. No metrics are produced once one of these is hit.
#[derive(Debug, thiserror::Error)]
#[error("record #{record_index} at byte offset {offset}: {kind}")]
pub struct DecodeError {
    pub record_index: usize,
    pub offset: usize,
    #[source]
    pub kind: DecodeErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("truncated length prefix")]
    TruncatedVarint,
    #[error("length prefix does not fit in 64 bits")]
    OverlongVarint,
    #[error("frame declares {declared} bytes but only {available} remain")]
    TruncatedFrame { declared: u64, available: usize },
    #[error("log does not start with a version record")]
    MissingVersionHeader,
    #[error("unsupported log version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },
    #[error("second version record")]
    DuplicateVersion,
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] MalformedRecord),
}
impl From<FrameError> for DecodeErrorKind {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::TruncatedVarint => Self::TruncatedVarint,
            FrameError::OverlongVarint => Self::OverlongVarint,
            FrameError::TruncatedFrame {
                declared,
                available,
            } => Self::TruncatedFrame {
                declared,
                available,
            },
        }
    }
}

/// Recoverable problem met while decoding; the offending record was skipped.
#[derive(Debug)]
pub struct Diagnostic {
    pub record_index: usize,
    pub offset: usize,
    pub kind: DiagnosticKind,
}
impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "record #{} at byte offset {}: {}",
            self.record_index, self.offset, self.kind
        )
    }
}

#[derive(Debug)]
pub enum DiagnosticKind {
    UnknownRecordKind { tag: u32 },
    MalformedRecord(MalformedRecord),
}
impl core::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownRecordKind { tag } => write!(f, "unknown record kind {tag}"),
            Self::MalformedRecord(e) => write!(f, "malformed record: {e}"),
        }
    }
}
