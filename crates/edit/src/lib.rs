//! Value types for bulk workspace edits.
//!
//! A bulk edit is an ordered, mixed-kind list of [`EditOperation`]s lifted
//! from raw [`EditDescriptor`]s. The operation's kind tag alone drives
//! batching and applier dispatch; kind-specific payloads stay opaque to the
//! orchestration layer.

/// Raw caller-supplied edit descriptors and their normalization.
pub mod descriptor;
/// Normalized, immutable edit operations.
pub mod operation;
/// Human-readable accounts of an edit list.
pub mod summary;

pub use descriptor::{EditDescriptor, NormalizeError, normalize};
pub use operation::{
	CharSpan, EditKind, EditMetadata, EditOperation, FileEditOptions, ResourceAttachmentEdit,
	ResourceCellEdit, ResourceFileEdit, ResourceTextEdit, TextReplacement,
};
pub use summary::aria_summary;
