//! Progress reporting for bulk edit application.

use std::sync::Arc;

/// A single progress report.
///
/// The first report of an operation carries `total` to establish the scale;
/// later reports carry `increment` to advance it. A report with a total but
/// no increment puts the consumer into indeterminate mode.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressStep {
	pub total: Option<u32>,
	pub increment: Option<f64>,
}

impl ProgressStep {
	/// Advance by `increment` units.
	pub fn increment(increment: f64) -> Self {
		Self {
			total: None,
			increment: Some(increment),
		}
	}
}

/// Consumer of progress reports for one bulk edit.
pub trait ProgressSink: Send + Sync {
	fn report(&self, step: ProgressStep);
}

/// Sink that drops every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
	fn report(&self, _step: ProgressStep) {}
}

/// Per-edit ticker handed to appliers.
///
/// Each tick advances the overall scale by one edit's share, so progress
/// reflects edit-count granularity regardless of how edits are batched
/// into runs.
#[derive(Clone)]
pub struct RunProgress {
	sink: Arc<dyn ProgressSink>,
	per_edit: f64,
}

impl RunProgress {
	pub(crate) fn new(sink: Arc<dyn ProgressSink>, edit_count: usize) -> Self {
		Self {
			sink,
			per_edit: 100.0 / edit_count as f64,
		}
	}

	/// Reports one edit as consumed.
	pub fn tick(&self) {
		self.sink.report(ProgressStep::increment(self.per_edit));
	}
}
