//! One bulk edit: run partitioning, applier dispatch, and cancellation.
//!
//! A [`BulkEditOperation`] owns the normalized edit list of a single
//! `apply` call. It partitions the list into maximal contiguous same-kind
//! runs, drives each run through the matching applier in order, and
//! aggregates the touched resources. Mixed-kind ordering is preserved:
//! same-kind neighbors batch together, but an edit never moves past a
//! neighbor of a different kind.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::trace;
use url::Url;

use emend_edit::{EditKind, EditOperation, aria_summary};

use crate::applier::{EditApplierHost, EditReason, RunContext};
use crate::error::BulkEditError;
use crate::host::EditorId;
use crate::progress::{ProgressSink, ProgressStep, RunProgress};
use crate::undo::{UndoRedoGroup, UndoRedoSource};

/// Where an operation is in its single-use lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpState {
	Idle,
	Running,
	Completed,
	Canceled,
	Failed,
}

/// Inputs shared by every run of one bulk edit.
pub struct ApplyScope {
	pub label: Option<String>,
	pub code: Option<String>,
	pub editor: Option<EditorId>,
	pub progress: Arc<dyn ProgressSink>,
	pub token: CancellationToken,
	pub undo_group: Arc<UndoRedoGroup>,
	pub undo_source: Option<Arc<UndoRedoSource>>,
	pub confirm_before_undo: bool,
	pub reason: Option<EditReason>,
}

/// Applies one ordered, mixed-kind edit list as a sequence of homogeneous
/// runs.
///
/// Constructed per `apply` call for exactly one [`perform`] invocation.
///
/// [`perform`]: BulkEditOperation::perform
pub struct BulkEditOperation {
	appliers: Arc<dyn EditApplierHost>,
	edits: Vec<EditOperation>,
	scope: ApplyScope,
	state: OpState,
}

impl BulkEditOperation {
	pub fn new(appliers: Arc<dyn EditApplierHost>, edits: Vec<EditOperation>, scope: ApplyScope) -> Self {
		Self {
			appliers,
			edits,
			scope,
			state: OpState::Idle,
		}
	}

	pub fn state(&self) -> OpState {
		self.state
	}

	/// Human-readable account of what this operation was built from.
	///
	/// Computed over the classified edit list, not over what actually ran;
	/// a cancelled operation reports the same summary as a completed one.
	pub fn aria_message(&self) -> String {
		aria_summary(&self.edits)
	}

	/// Applies all runs in order and returns the touched resources.
	///
	/// Cancellation is cooperative and checked once per run boundary: runs
	/// that already completed are kept, remaining runs are never started,
	/// and the partial result is returned as a normal completion. An
	/// applier error aborts the remaining runs and propagates; completed
	/// runs are not rolled back.
	pub async fn perform(&mut self) -> Result<Vec<Url>, BulkEditError> {
		self.state = OpState::Running;
		if self.edits.is_empty() {
			self.state = OpState::Completed;
			return Ok(Vec::new());
		}

		let run_lengths = partition_runs(&self.edits);
		trace!(edits = self.edits.len(), runs = run_lengths.len(), "bulk edit starting");

		// A single edit has unpredictable duration; leave the scale
		// indeterminate instead of jumping 0 to 100.
		let increment = if self.edits.len() > 1 { Some(0.0) } else { None };
		self.scope.progress.report(ProgressStep {
			total: Some(100),
			increment,
		});

		let ctx = RunContext {
			label: self.scope.label.clone(),
			code: self.scope.code.clone(),
			editor: self.scope.editor,
			undo_group: Arc::clone(&self.scope.undo_group),
			undo_source: self.scope.undo_source.clone(),
			confirm_before_undo: self.scope.confirm_before_undo,
			progress: RunProgress::new(Arc::clone(&self.scope.progress), self.edits.len()),
			token: self.scope.token.clone(),
		};

		let mut resources: Vec<Url> = Vec::new();
		let mut index = 0usize;
		for length in run_lengths {
			if self.scope.token.is_cancelled() {
				trace!(consumed = index, "bulk edit cancelled between runs");
				self.state = OpState::Canceled;
				return Ok(resources);
			}
			let run = &self.edits[index..index + length];
			match self.dispatch_run(&ctx, run).await {
				Ok(touched) => resources.extend(touched),
				Err(error) => {
					self.state = OpState::Failed;
					return Err(error.into());
				}
			}
			index += length;
		}

		self.state = OpState::Completed;
		Ok(resources)
	}

	async fn dispatch_run(
		&self,
		ctx: &RunContext,
		run: &[EditOperation],
	) -> Result<Vec<Url>, crate::applier::ApplierError> {
		match run[0].kind() {
			EditKind::Text => {
				let batch: Vec<_> = run
					.iter()
					.filter_map(|op| match op {
						EditOperation::Text(edit) => Some(edit.clone()),
						_ => None,
					})
					.collect();
				debug_assert_eq!(batch.len(), run.len());
				self.appliers
					.apply_text_edits(ctx, batch, self.scope.reason.as_ref())
					.await
			}
			EditKind::File => {
				let batch: Vec<_> = run
					.iter()
					.filter_map(|op| match op {
						EditOperation::File(edit) => Some(edit.clone()),
						_ => None,
					})
					.collect();
				debug_assert_eq!(batch.len(), run.len());
				self.appliers.apply_file_edits(ctx, batch).await
			}
			EditKind::Cell => {
				let batch: Vec<_> = run
					.iter()
					.filter_map(|op| match op {
						EditOperation::Cell(edit) => Some(edit.clone()),
						_ => None,
					})
					.collect();
				debug_assert_eq!(batch.len(), run.len());
				self.appliers.apply_cell_edits(ctx, batch).await
			}
			EditKind::Attachment => {
				let batch: Vec<_> = run
					.iter()
					.filter_map(|op| match op {
						EditOperation::Attachment(edit) => Some(edit.clone()),
						_ => None,
					})
					.collect();
				debug_assert_eq!(batch.len(), run.len());
				self.appliers.apply_attachment_edits(ctx, batch).await
			}
		}
	}
}

/// Splits `edits` into maximal contiguous same-kind runs, returned as run
/// lengths.
///
/// Concatenating the runs in order reproduces the list exactly; every edit
/// belongs to exactly one run and adjacent runs differ in kind.
pub(crate) fn partition_runs(edits: &[EditOperation]) -> Vec<usize> {
	let mut lengths: Vec<usize> = Vec::new();
	let mut previous: Option<EditKind> = None;
	for edit in edits {
		let kind = edit.kind();
		match lengths.last_mut() {
			Some(last) if previous == Some(kind) => *last += 1,
			_ => lengths.push(1),
		}
		previous = Some(kind);
	}
	lengths
}
