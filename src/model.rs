//! Metrics handed to the charting side.
//!
//! Every series is in milliseconds. Within one mapping all series have the same length, and the
//! element at index `i` of each belongs to the same input frame as `frame_ids[i]`.

/// cpu / draw / gpu durations of a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbsoluteSeries {
    pub cpu_ms: Vec<f64>,
    pub draw_ms: Vec<f64>,
    pub gpu_ms: Vec<f64>,
}
impl AbsoluteSeries {
    pub(crate) fn push(&mut self, cpu_ms: f64, draw_ms: f64, gpu_ms: f64) {
        self.cpu_ms.push(cpu_ms);
        self.draw_ms.push(draw_ms);
        self.gpu_ms.push(gpu_ms);
    }

    pub fn len(&self) -> usize {
        self.cpu_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_ms.is_empty()
    }

    pub fn named_series(&self) -> [(&'static str, &[f64]); 3] {
        [
            ("cpu_ms", self.cpu_ms.as_slice()),
            ("draw_ms", self.draw_ms.as_slice()),
            ("gpu_ms", self.gpu_ms.as_slice()),
        ]
    }
}

/// Session frame timestamps as offsets from one predicted deadline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativeSeries {
    pub predicted_ms: Vec<f64>,
    pub start_cpu_ms: Vec<f64>,
    pub done_cpu_ms: Vec<f64>,
    pub done_draw_ms: Vec<f64>,
    pub done_gpu_ms: Vec<f64>,
}
impl RelativeSeries {
    pub fn len(&self) -> usize {
        self.predicted_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted_ms.is_empty()
    }

    pub fn named_series(&self) -> [(&'static str, &[f64]); 5] {
        [
            ("predicted_ms", self.predicted_ms.as_slice()),
            ("start_cpu_ms", self.start_cpu_ms.as_slice()),
            ("done_cpu_ms", self.done_cpu_ms.as_slice()),
            ("done_draw_ms", self.done_draw_ms.as_slice()),
            ("done_gpu_ms", self.done_gpu_ms.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpuOnlySeries {
    pub gpu_ms: Vec<f64>,
}
impl GpuOnlySeries {
    pub fn len(&self) -> usize {
        self.gpu_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gpu_ms.is_empty()
    }

    pub fn named_series(&self) -> [(&'static str, &[f64]); 1] {
        [("gpu_ms", self.gpu_ms.as_slice())]
    }
}

/// Compositor present timestamps as offsets from the desired present time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentRelativeSeries {
    pub predicted_ms: Vec<f64>,
    pub start_cpu_ms: Vec<f64>,
    pub done_cpu_ms: Vec<f64>,
    pub submitted_ms: Vec<f64>,
    pub gpu_ms: Vec<f64>,
    pub present_ms: Vec<f64>,
}
impl PresentRelativeSeries {
    pub fn len(&self) -> usize {
        self.predicted_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted_ms.is_empty()
    }

    pub fn named_series(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("predicted_ms", self.predicted_ms.as_slice()),
            ("start_cpu_ms", self.start_cpu_ms.as_slice()),
            ("done_cpu_ms", self.done_cpu_ms.as_slice()),
            ("submitted_ms", self.submitted_ms.as_slice()),
            ("gpu_ms", self.gpu_ms.as_slice()),
            ("present_ms", self.present_ms.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemMetrics {
    /// aligned with `absolute` and `relative_present`
    pub frame_ids: Vec<i64>,
    pub absolute: AbsoluteSeries,
    /// one entry per gpu info record, not aligned with `frame_ids`
    pub absolute_gpu_only: GpuOnlySeries,
    pub relative_present: PresentRelativeSeries,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsModel {
    /// session frame ids, aligned with `absolute`, `relative_gpu` and `relative_display`
    pub frame_ids: Vec<i64>,
    pub absolute: AbsoluteSeries,
    pub relative_gpu: RelativeSeries,
    pub relative_display: RelativeSeries,
    pub system: SystemMetrics,
}
impl MetricsModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// true when no record contributed anything
    pub fn is_empty(&self) -> bool {
        self.frame_ids.is_empty()
            && self.system.frame_ids.is_empty()
            && self.system.absolute_gpu_only.is_empty()
    }
}
