//! Stream decoder: frames the log, gates on the version record, feeds the aggregator.

use shared_frame_metrics_proto::{
    Frame, FrameRecord, Frames, RecordDecode, RecordKind, SchemaVersion, VersionMarker,
    decode_record,
};

use crate::{
    aggregate::Aggregator,
    error::{DecodeError, DecodeErrorKind, Diagnostic, DiagnosticKind},
    model::MetricsModel,
    options::{DecodeOptions, MalformedPolicy},
};

/// Result of a successful decode.
#[derive(Debug)]
pub struct DecodedLog {
    pub metrics: MetricsModel,
    /// records that were skipped, in stream order
    pub diagnostics: Vec<Diagnostic>,
    /// `None` only for an empty log decoded without a header-less layout
    pub schema: Option<SchemaVersion>,
    /// `None` for empty and header-less logs
    pub version: Option<VersionMarker>,
    /// number of frames read, header included
    pub records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    ExpectVersion,
    Streaming(SchemaVersion),
}

#[derive(Debug, Clone, Default)]
pub struct LogDecoder {
    options: DecodeOptions,
}
impl LogDecoder {
    pub const fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes a fully loaded log.
    ///
    /// An empty buffer is a valid, empty log.
    #[tracing::instrument(name = "LogDecoder::decode", skip_all, fields(len = bytes.len()))]
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedLog, DecodeError> {
        let mut state = match self.options.headerless_schema {
            Some(schema) => GateState::Streaming(schema),
            None => GateState::ExpectVersion,
        };
        let mut version = None;
        let mut aggregator = Aggregator::new();
        let mut diagnostics = Vec::new();

        let mut frames = Frames::new(bytes);
        while let Some(frame) = frames.next() {
            let frame = frame.map_err(|e| {
                tracing::error!(
                    record_index = frames.index(),
                    offset = frames.offset(),
                    reason = %e,
                    "framing failed"
                );

                DecodeError {
                    record_index: frames.index(),
                    offset: frames.offset(),
                    kind: e.into(),
                }
            })?;

            match state {
                GateState::ExpectVersion => {
                    let v = Self::expect_version(&frame)?;
                    let schema = SchemaVersion::for_major(v.major).ok_or_else(|| {
                        fatal(
                            &frame,
                            DecodeErrorKind::UnsupportedVersion {
                                major: v.major,
                                minor: v.minor,
                            },
                        )
                    })?;
                    tracing::debug!(major = v.major, minor = v.minor, %schema, "log version");

                    version = Some(v);
                    state = GateState::Streaming(schema);
                }
                GateState::Streaming(schema) => {
                    if let Some(d) = self.stream_record(&frame, schema, &mut aggregator)? {
                        diagnostics.push(d);
                    }
                }
            }
        }

        let schema = match state {
            GateState::Streaming(schema) => Some(schema),
            GateState::ExpectVersion => None,
        };
        let metrics = aggregator.finish();
        tracing::info!(
            records = frames.index(),
            session_frames = metrics.frame_ids.len(),
            system_frames = metrics.system.frame_ids.len(),
            gpu_samples = metrics.system.absolute_gpu_only.len(),
            skipped = diagnostics.len(),
            "log decoded"
        );

        Ok(DecodedLog {
            metrics,
            diagnostics,
            schema,
            version,
            records: frames.index(),
        })
    }

    /// The version record has the same encoding in every versioned layout.
    fn expect_version(frame: &Frame<'_>) -> Result<VersionMarker, DecodeError> {
        match decode_record(frame.payload, SchemaVersion::V1) {
            Ok(RecordDecode::Known(FrameRecord::Version(v))) => Ok(v),
            Ok(RecordDecode::Known(r)) => {
                tracing::debug!(kind = %r.kind(), "first record is not a version record");
                Err(fatal(frame, DecodeErrorKind::MissingVersionHeader))
            }
            Ok(RecordDecode::Unknown { tag }) => {
                tracing::debug!(tag, "first record is of unknown kind");
                Err(fatal(frame, DecodeErrorKind::MissingVersionHeader))
            }
            Err(e) => {
                tracing::debug!(reason = %e, "first record is malformed");
                Err(fatal(frame, DecodeErrorKind::MissingVersionHeader))
            }
        }
    }

    fn stream_record(
        &self,
        frame: &Frame<'_>,
        schema: SchemaVersion,
        aggregator: &mut Aggregator,
    ) -> Result<Option<Diagnostic>, DecodeError> {
        let kind = match decode_record(frame.payload, schema) {
            // a version discriminant is a duplicate whether or not its body decodes
            Ok(RecordDecode::Known(FrameRecord::Version(_))) => {
                return Err(fatal(frame, DecodeErrorKind::DuplicateVersion));
            }
            Err(e) if e.kind() == Some(RecordKind::Version) => {
                tracing::debug!(reason = %e, "broken version record");
                return Err(fatal(frame, DecodeErrorKind::DuplicateVersion));
            }
            Ok(RecordDecode::Known(record)) => {
                tracing::debug!(index = frame.index, kind = %record.kind(), "record");
                aggregator.consume(&record);

                return Ok(None);
            }
            Ok(RecordDecode::Unknown { tag }) => {
                tracing::warn!(
                    record_index = frame.index,
                    offset = frame.offset,
                    tag,
                    "unknown record kind, skipped"
                );

                DiagnosticKind::UnknownRecordKind { tag }
            }
            Err(e) => match self.options.malformed {
                MalformedPolicy::Abort => return Err(fatal(frame, e.into())),
                MalformedPolicy::Skip => {
                    tracing::warn!(
                        record_index = frame.index,
                        offset = frame.offset,
                        reason = %e,
                        "malformed record, skipped"
                    );

                    DiagnosticKind::MalformedRecord(e)
                }
            },
        };

        Ok(Some(Diagnostic {
            record_index: frame.index,
            offset: frame.offset,
            kind,
        }))
    }
}

fn fatal(frame: &Frame<'_>, kind: DecodeErrorKind) -> DecodeError {
    tracing::error!(record_index = frame.index, offset = frame.offset, %kind, "decode failed");

    DecodeError {
        record_index: frame.index,
        offset: frame.offset,
        kind,
    }
}

/// Decodes with default options; skipped records are only reported through `tracing`.
pub fn decode_log(bytes: &[u8]) -> Result<MetricsModel, DecodeError> {
    LogDecoder::default().decode(bytes).map(|d| d.metrics)
}
