//! Kind-specific edit appliers.
//!
//! Appliers are external collaborators: they own diffing, conflict
//! handling, and the actual mutation of documents and files. The engine
//! hands each one a homogeneous batch plus the shared [`RunContext`] and
//! collects the affected resources.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use emend_edit::{
	EditKind, ResourceAttachmentEdit, ResourceCellEdit, ResourceFileEdit, ResourceTextEdit,
};

use crate::host::EditorId;
use crate::progress::RunProgress;
use crate::undo::{UndoRedoGroup, UndoRedoSource};

/// Why a text edit was issued. Forwarded verbatim to text appliers, which
/// may use it to attribute the change in document history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditReason(pub String);

impl EditReason {
	pub fn new(reason: impl Into<String>) -> Self {
		Self(reason.into())
	}
}

/// Failure surfaced by an applier. Fatal to the whole bulk edit; runs that
/// already completed are not rolled back.
#[derive(Debug, Error)]
#[error("{kind} applier failed: {message}")]
pub struct ApplierError {
	pub kind: EditKind,
	pub message: String,
}

impl ApplierError {
	pub fn new(kind: EditKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}
}

/// Inputs shared by every run of one bulk edit.
#[derive(Clone)]
pub struct RunContext {
	/// Human-readable name of the overall operation.
	pub label: Option<String>,
	/// Stable tag identifying the operation kind for undo bookkeeping.
	pub code: Option<String>,
	/// Editor to anchor text edits to, when one was resolved.
	pub editor: Option<EditorId>,
	/// Group all undo entries of this bulk edit share.
	pub undo_group: Arc<UndoRedoGroup>,
	pub undo_source: Option<Arc<UndoRedoSource>>,
	/// Ask the user before undoing this bulk edit. Honored by the text and
	/// file appliers.
	pub confirm_before_undo: bool,
	/// Per-edit progress ticker.
	pub progress: RunProgress,
	pub token: CancellationToken,
}

/// The four kind-specific appliers, implemented by the host.
///
/// Each call receives one run. An applier observing `ctx.token` mid-run may
/// finish the run or stop early at its own granularity; the engine checks
/// the token only between runs. Returned resources are the distinct targets
/// the run touched.
#[async_trait]
pub trait EditApplierHost: Send + Sync {
	async fn apply_text_edits(
		&self,
		ctx: &RunContext,
		edits: Vec<ResourceTextEdit>,
		reason: Option<&EditReason>,
	) -> Result<Vec<Url>, ApplierError>;

	async fn apply_file_edits(
		&self,
		ctx: &RunContext,
		edits: Vec<ResourceFileEdit>,
	) -> Result<Vec<Url>, ApplierError>;

	async fn apply_cell_edits(
		&self,
		ctx: &RunContext,
		edits: Vec<ResourceCellEdit>,
	) -> Result<Vec<Url>, ApplierError>;

	async fn apply_attachment_edits(
		&self,
		ctx: &RunContext,
		edits: Vec<ResourceAttachmentEdit>,
	) -> Result<Vec<Url>, ApplierError>;
}
