//! Bulk edit orchestration engine.
//!
//! Applies a heterogeneous, ordered stream of workspace edits as one
//! logical, cancellable, progress-reporting, undo/redo-grouped operation.
//! The engine partitions the stream into contiguous same-kind runs and
//! drives each run through a kind-specific applier supplied by the host;
//! the appliers, preview UI, dialogs, and save machinery stay behind the
//! trait seams in [`host`] and [`applier`].

/// Kind-specific applier seam and the shared per-run context.
pub mod applier;
/// Bulk edit failure taxonomy.
pub mod error;
/// Host collaborator traits: editors, dialogs, working copies, lifecycle.
pub mod host;
/// One bulk edit's partition, dispatch, and state machine.
pub mod operation;
/// Progress reporting surfaces.
pub mod progress;
/// The process-wide bulk edit facade.
pub mod service;
/// Undo/redo grouping shared across the edits of one bulk operation.
pub mod undo;

pub use emend_edit::{
	EditDescriptor, EditKind, EditMetadata, EditOperation, NormalizeError, aria_summary,
};

pub use applier::{ApplierError, EditApplierHost, EditReason, RunContext};
pub use error::BulkEditError;
pub use host::{
	ActiveEditor, Confirmation, ConfirmResult, DialogHost, Disposable, EditorHost, EditorId,
	EditorSurface, HostServices, LifecycleHost, PreviewHandler, SaveError, ShutdownBlocker,
	ShutdownReason, WorkingCopy, WorkingCopyHost,
};
pub use operation::{ApplyScope, BulkEditOperation, OpState};
pub use progress::{NoProgress, ProgressSink, ProgressStep, RunProgress};
pub use service::{BulkEditOptions, BulkEditResult, BulkEditService};
pub use undo::{UndoRedoGroup, UndoRedoSource};
