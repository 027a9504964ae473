use shared_frame_metrics_proto::SchemaVersion;

/// What happens to a recognized record whose fields cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// report a diagnostic and continue with the next record
    #[default]
    Skip,
    /// fail the whole decode
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub malformed: MalformedPolicy,
    /// Decode a log without version record in this layout. Such a log never contains a version
    /// record, so none is looked for.
    pub headerless_schema: Option<SchemaVersion>,
}
impl DecodeOptions {
    pub const fn new() -> Self {
        Self {
            malformed: MalformedPolicy::Skip,
            headerless_schema: None,
        }
    }

    pub const fn malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    pub const fn headerless(mut self, schema: SchemaVersion) -> Self {
        self.headerless_schema = Some(schema);
        self
    }
}
