//! Process-wide bulk edit facade.
//!
//! # Purpose
//!
//! * Single entry point for applying a mixed stream of workspace edits.
//! * Owns the registry of undo/redo groups with an edit in flight.
//! * Owns the optional interactive preview hook.
//!
//! # Lifecycle
//!
//! * Construct once with [`HostServices`] and share behind an `Arc`.
//! * [`apply`] normalizes the raw descriptors, runs the preview hook when
//!   requested, resolves the target editor and undo/redo group, performs
//!   one [`BulkEditOperation`], then optionally saves touched working
//!   copies.
//! * A shutdown blocker is installed for the duration of each [`apply`]
//!   call and removed on every exit path; while installed it prompts the
//!   user before letting the host shut down.
//!
//! # Concurrency & ordering
//!
//! * [`apply`] is re-entrant; concurrent calls interleave at await points
//!   only.
//! * The active-group registry and the preview slot are locked in
//!   synchronous sections; no lock is held across an await.
//! * Edits within one call keep their relative order. Across calls there
//!   is no ordering guarantee.
//!
//! [`apply`]: BulkEditService::apply

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use url::Url;

use emend_edit::{EditDescriptor, aria_summary, normalize};

use crate::applier::EditReason;
use crate::error::BulkEditError;
use crate::host::{
	ActiveEditor, Confirmation, DialogHost, Disposable, EditorHost, EditorId, EditorSurface,
	HostServices, PreviewHandler, ShutdownBlocker, ShutdownReason,
};
use crate::operation::{ApplyScope, BulkEditOperation};
use crate::progress::{NoProgress, ProgressSink};
use crate::undo::{ActiveGroups, UndoRedoSource};

/// Options accepted by [`BulkEditService::apply`].
#[derive(Clone, Default)]
pub struct BulkEditOptions {
	/// Editor to anchor text edits to; defaults to the host's active
	/// editor.
	pub editor: Option<EditorSurface>,
	pub progress: Option<Arc<dyn ProgressSink>>,
	pub token: Option<CancellationToken>,
	/// Human-readable name of the operation, e.g. for undo stacks.
	pub label: Option<String>,
	/// Label safe to quote inside prompts; falls back to `label`.
	pub quotable_label: Option<String>,
	/// Stable tag identifying the operation for appliers' undo entries.
	pub code: Option<String>,
	/// Reuse the active undo/redo group with this id instead of creating a
	/// fresh one.
	pub undo_redo_group_id: Option<u64>,
	pub undo_redo_source: Option<Arc<UndoRedoSource>>,
	/// Ask the user before undoing this bulk edit.
	pub confirm_before_undo: bool,
	/// Force the preview hook even when no edit demands confirmation.
	pub show_preview: bool,
	/// Opt into saving touched working copies afterwards, gated on the
	/// host's auto-save setting.
	pub respect_auto_save_config: bool,
	/// Why the edit was issued; forwarded to text appliers.
	pub reason: Option<EditReason>,
}

/// Outcome of a bulk edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkEditResult {
	/// Screen-reader summary of the classified edit list.
	pub aria_summary: String,
	/// True when the post-preview edit list was non-empty. This does NOT
	/// imply every run completed: a bulk edit cancelled mid-stream still
	/// reports `true`.
	pub is_applied: bool,
}

/// The process-wide bulk edit entry point.
pub struct BulkEditService {
	host: HostServices,
	active_groups: ActiveGroups,
	preview_handler: Arc<Mutex<Option<Arc<dyn PreviewHandler>>>>,
}

impl BulkEditService {
	pub fn new(host: HostServices) -> Self {
		Self {
			host,
			active_groups: ActiveGroups::new(),
			preview_handler: Arc::new(Mutex::new(None)),
		}
	}

	/// Installs the process-wide preview handler.
	///
	/// One handler is active at a time; installing another replaces it.
	/// The returned handle uninstalls the handler on drop, guarded by
	/// identity: dropping a stale handle after a newer handler took the
	/// slot is a no-op.
	pub fn set_preview_handler(&self, handler: Arc<dyn PreviewHandler>) -> Disposable {
		*self.preview_handler.lock() = Some(Arc::clone(&handler));
		let slot = Arc::clone(&self.preview_handler);
		Disposable::new(move || {
			let mut current = slot.lock();
			if current.as_ref().is_some_and(|active| Arc::ptr_eq(active, &handler)) {
				*current = None;
			}
		})
	}

	pub fn has_preview_handler(&self) -> bool {
		self.preview_handler.lock().is_some()
	}

	/// Applies `descriptors` as one logical bulk edit.
	///
	/// An empty descriptor list is a complete no-op: no preview, no undo
	/// group, no shutdown blocker.
	///
	/// # Errors
	///
	/// Returns [`BulkEditError`] when a descriptor is unclassifiable or an
	/// applier fails. Failures are logged and rethrown, never downgraded
	/// to a `false` [`BulkEditResult::is_applied`]. Cancellation is not a
	/// failure; see [`BulkEditOperation::perform`].
	pub async fn apply(
		&self,
		descriptors: Vec<EditDescriptor>,
		options: BulkEditOptions,
	) -> Result<BulkEditResult, BulkEditError> {
		let mut edits = normalize(descriptors)?;
		if edits.is_empty() {
			return Ok(BulkEditResult {
				aria_summary: aria_summary(&edits),
				is_applied: false,
			});
		}

		let handler = self.preview_handler.lock().clone();
		if let Some(handler) = handler
			&& (options.show_preview || edits.iter().any(|edit| edit.needs_confirmation()))
		{
			edits = handler.preview(edits, &options).await;
		}
		let edit_count = edits.len();

		let editor = resolve_editor(options.editor, self.host.editors.as_ref());

		let group_guard = self.active_groups.acquire(options.undo_redo_group_id);

		let label = options.quotable_label.or(options.label);
		let blocker: Arc<dyn ShutdownBlocker> = Arc::new(BulkEditBlocker {
			label: label.clone(),
			dialogs: Arc::clone(&self.host.dialogs),
		});
		let _shutdown_guard = self.host.lifecycle.install_shutdown_blocker(blocker);

		let mut operation = BulkEditOperation::new(
			Arc::clone(&self.host.appliers),
			edits,
			ApplyScope {
				label,
				code: options.code,
				editor,
				progress: options.progress.unwrap_or_else(|| Arc::new(NoProgress)),
				token: options.token.unwrap_or_default(),
				undo_group: Arc::clone(group_guard.group()),
				undo_source: options.undo_redo_source,
				confirm_before_undo: options.confirm_before_undo,
				reason: options.reason,
			},
		);

		let resources = match operation.perform().await {
			Ok(resources) => resources,
			Err(e) => {
				error!(error = %e, "bulk edit failed");
				return Err(e);
			}
		};

		if options.respect_auto_save_config
			&& self.host.working_copies.auto_save_after_refactoring()
			&& resources.len() > 1
		{
			self.save_touched(&resources).await;
		}

		Ok(BulkEditResult {
			aria_summary: operation.aria_message(),
			is_applied: edit_count > 0,
		})
	}

	/// Saves every currently-dirty working copy whose resource was touched.
	///
	/// The bulk edit has already been applied at this point; individual
	/// save failures are logged and contained.
	async fn save_touched(&self, resources: &[Url]) {
		let touched: HashSet<&Url> = resources.iter().collect();
		for copy in self.host.working_copies.dirty_working_copies() {
			if !touched.contains(copy.resource()) {
				continue;
			}
			if let Err(e) = copy.save().await {
				warn!(error = %e, "bulk edit auto-save failed");
			}
		}
	}
}

/// Resolves the editor a bulk edit anchors its text edits to.
///
/// The caller-supplied surface wins over the host's focused editor; a diff
/// surface contributes its modified side. Either way a read-only surface is
/// treated as no editor at all; the bulk edit still proceeds against the
/// underlying documents.
fn resolve_editor(supplied: Option<EditorSurface>, editors: &dyn EditorHost) -> Option<EditorId> {
	let surface = supplied.or_else(|| {
		editors.active_editor().map(|active| match active {
			ActiveEditor::Text(surface) => surface,
			ActiveEditor::Diff { modified } => modified,
		})
	})?;
	if surface.read_only { None } else { Some(surface.id) }
}

/// Shutdown blocker installed for the duration of one `apply` call.
///
/// Prompts before letting the host shut down and vetoes unless the user
/// confirms.
struct BulkEditBlocker {
	label: Option<String>,
	dialogs: Arc<dyn DialogHost>,
}

#[async_trait]
impl ShutdownBlocker for BulkEditBlocker {
	async fn should_veto(&self, reason: ShutdownReason) -> bool {
		let label = self.label.as_deref().unwrap_or("File operation");
		let (message, primary_button) = match reason {
			ShutdownReason::Close => (
				format!("Are you sure you want to close the window? '{label}' is in progress."),
				"Close Window",
			),
			ShutdownReason::Load => (
				format!("Are you sure you want to change the workspace? '{label}' is in progress."),
				"Change Workspace",
			),
			ShutdownReason::Reload => (
				format!("Are you sure you want to reload the window? '{label}' is in progress."),
				"Reload Window",
			),
			ShutdownReason::Quit => (
				format!("Are you sure you want to quit? '{label}' is in progress."),
				"Quit",
			),
		};
		let result = self
			.dialogs
			.confirm(Confirmation {
				message,
				detail: None,
				primary_button: Some(primary_button.to_string()),
			})
			.await;
		!result.confirmed
	}
}
