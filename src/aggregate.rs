//! Folds decoded records into a [`MetricsModel`].

use shared_frame_metrics_proto::{FrameRecord, GpuInfo, PresentInfo, SessionFrame};

use crate::model::{MetricsModel, RelativeSeries};

/// `a - b` in milliseconds.
///
/// The nanosecond difference is taken exactly on integers, so it may be negative; only the
/// scaling happens in floating point.
#[inline]
pub fn diff_ns_to_ms(a: u64, b: u64) -> f64 {
    wide_diff_ns_to_ms(i128::from(a), i128::from(b))
}

/// Same as [`diff_ns_to_ms`] for timestamps that were themselves derived by subtraction.
#[inline]
fn wide_diff_ns_to_ms(a: i128, b: i128) -> f64 {
    (a - b) as f64 / 1000.0 / 1000.0
}

fn push_relative(d: &mut RelativeSeries, to: u64, f: &SessionFrame) {
    d.predicted_ms.push(diff_ns_to_ms(f.when_predicted_ns, to));
    d.start_cpu_ms.push(diff_ns_to_ms(f.when_wait_woke_ns, to));
    d.done_cpu_ms.push(diff_ns_to_ms(f.when_begin_ns, to));
    d.done_draw_ms.push(diff_ns_to_ms(f.when_delivered_ns, to));
    d.done_gpu_ms.push(diff_ns_to_ms(f.when_gpu_done_ns, to));
}

/// Order-dependent reducer over the record stream.
#[derive(Debug, Default)]
pub struct Aggregator {
    metrics: MetricsModel,
}
impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn metrics(&self) -> &MetricsModel {
        &self.metrics
    }

    pub fn finish(self) -> MetricsModel {
        self.metrics
    }

    pub fn consume(&mut self, record: &FrameRecord) {
        match record {
            FrameRecord::SessionFrame(f) => self.session_frame(f),
            FrameRecord::SystemGpuInfo(g) => self.system_gpu_info(g),
            FrameRecord::SystemPresentInfo(p) => self.system_present_info(p),
            FrameRecord::SystemFrame(_) | FrameRecord::Used(_) | FrameRecord::Version(_) => (),
        }
    }

    fn session_frame(&mut self, f: &SessionFrame) {
        // never displayed, not a latency sample
        if f.discarded {
            return;
        }

        let m = &mut self.metrics;
        m.frame_ids.push(f.frame_id);
        m.absolute.push(
            diff_ns_to_ms(f.when_begin_ns, f.when_wait_woke_ns),
            diff_ns_to_ms(f.when_delivered_ns, f.when_begin_ns),
            diff_ns_to_ms(f.when_gpu_done_ns, f.when_delivered_ns),
        );
        push_relative(&mut m.relative_gpu, f.predicted_gpu_done_time_ns, f);
        push_relative(&mut m.relative_display, f.predicted_display_time_ns, f);
    }

    fn system_gpu_info(&mut self, g: &GpuInfo) {
        self.metrics
            .system
            .absolute_gpu_only
            .gpu_ms
            .push(diff_ns_to_ms(g.gpu_end_ns, g.gpu_start_ns));
    }

    fn system_present_info(&mut self, p: &PresentInfo) {
        // margin is measured back from the actual present
        let when_gpu_done_ns =
            i128::from(p.actual_present_time_ns) - i128::from(p.present_margin_ns);
        let to = i128::from(p.desired_present_time_ns);

        let s = &mut self.metrics.system;
        s.frame_ids.push(p.frame_id);
        s.absolute.push(
            diff_ns_to_ms(p.when_began_ns, p.when_woke_ns),
            diff_ns_to_ms(p.when_submitted_ns, p.when_began_ns),
            wide_diff_ns_to_ms(when_gpu_done_ns, i128::from(p.when_submitted_ns)),
        );

        let r = &mut s.relative_present;
        r.predicted_ms.push(diff_ns_to_ms(p.when_predict_ns, p.desired_present_time_ns));
        r.start_cpu_ms.push(diff_ns_to_ms(p.when_woke_ns, p.desired_present_time_ns));
        r.done_cpu_ms.push(diff_ns_to_ms(p.when_began_ns, p.desired_present_time_ns));
        r.submitted_ms.push(diff_ns_to_ms(p.when_submitted_ns, p.desired_present_time_ns));
        r.gpu_ms.push(wide_diff_ns_to_ms(when_gpu_done_ns, to));
        r.present_ms.push(diff_ns_to_ms(p.actual_present_time_ns, p.desired_present_time_ns));
    }
}
