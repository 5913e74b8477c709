//! Host collaborator seams.
//!
//! The engine is embedded in an editor host and reaches everything UI- or
//! workspace-shaped through the narrow traits here: editor lookup,
//! confirmation dialogs, dirty working copies, shutdown hooks, and the
//! optional preview step. Hosts implement these once and hand the bundle
//! to [`crate::service::BulkEditService::new`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use emend_edit::EditOperation;

use crate::applier::EditApplierHost;
use crate::service::BulkEditOptions;

/// Opaque identifier for an editor pane owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditorId(pub u64);

/// A focusable editor surface as reported by the host.
#[derive(Clone, Copy, Debug)]
pub struct EditorSurface {
	pub id: EditorId,
	pub read_only: bool,
}

/// The host's currently focused editor.
#[derive(Clone, Copy, Debug)]
pub enum ActiveEditor {
	Text(EditorSurface),
	/// A side-by-side comparison; bulk edits target the modified side.
	Diff { modified: EditorSurface },
}

/// Editor lookup surface.
pub trait EditorHost: Send + Sync {
	fn active_editor(&self) -> Option<ActiveEditor>;
}

/// Request for a yes/no confirmation prompt.
#[derive(Clone, Debug)]
pub struct Confirmation {
	pub message: String,
	pub detail: Option<String>,
	pub primary_button: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct ConfirmResult {
	pub confirmed: bool,
}

/// Modal confirmation surface.
#[async_trait]
pub trait DialogHost: Send + Sync {
	async fn confirm(&self, confirmation: Confirmation) -> ConfirmResult;
}

/// Failure to persist a single working copy.
#[derive(Debug, Error)]
#[error("save failed for {resource}: {reason}")]
pub struct SaveError {
	pub resource: Url,
	pub reason: String,
}

/// A dirty document the host can persist.
#[async_trait]
pub trait WorkingCopy: Send + Sync {
	fn resource(&self) -> &Url;

	async fn save(&self) -> Result<(), SaveError>;
}

/// Host view over unsaved documents and the save policy.
pub trait WorkingCopyHost: Send + Sync {
	/// Working copies that are currently dirty.
	fn dirty_working_copies(&self) -> Vec<Arc<dyn WorkingCopy>>;

	/// Whether the host wants touched files saved after refactoring-style
	/// bulk edits.
	fn auto_save_after_refactoring(&self) -> bool;
}

/// Why the host is shutting down. Drives prompt wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownReason {
	/// The window is closing.
	Close,
	/// The application is quitting.
	Quit,
	/// The window is reloading.
	Reload,
	/// Another workspace is about to load into this window.
	Load,
}

/// Participant consulted when the host attempts to shut down.
#[async_trait]
pub trait ShutdownBlocker: Send + Sync {
	/// Returns true to veto the shutdown.
	async fn should_veto(&self, reason: ShutdownReason) -> bool;
}

/// Host shutdown hooks.
pub trait LifecycleHost: Send + Sync {
	/// Registers `blocker` until the returned handle is dropped.
	fn install_shutdown_blocker(&self, blocker: Arc<dyn ShutdownBlocker>) -> Disposable;
}

/// Interactive review step invoked before edits are applied.
///
/// The handler may hand back the same list, a filtered one (the user
/// deselected edits), or an empty one (the user bailed out entirely).
#[async_trait]
pub trait PreviewHandler: Send + Sync {
	async fn preview(&self, edits: Vec<EditOperation>, options: &BulkEditOptions) -> Vec<EditOperation>;
}

/// Scoped registration handle; runs its release action exactly once on drop.
pub struct Disposable(Option<Box<dyn FnOnce() + Send>>);

impl Disposable {
	pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
		Self(Some(Box::new(release)))
	}

	/// Handle with no release action.
	pub fn empty() -> Self {
		Self(None)
	}
}

impl Drop for Disposable {
	fn drop(&mut self) {
		if let Some(release) = self.0.take() {
			release();
		}
	}
}

impl fmt::Debug for Disposable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Disposable").field(&self.0.is_some()).finish()
	}
}

/// Bundle of host collaborators the service is constructed with.
#[derive(Clone)]
pub struct HostServices {
	pub appliers: Arc<dyn EditApplierHost>,
	pub editors: Arc<dyn EditorHost>,
	pub dialogs: Arc<dyn DialogHost>,
	pub working_copies: Arc<dyn WorkingCopyHost>,
	pub lifecycle: Arc<dyn LifecycleHost>,
}
