//! Normalized edit operations.
//!
//! An [`EditOperation`] is an immutable description of one atomic change,
//! tagged by [`EditKind`]. Once lifted from a raw descriptor it is never
//! mutated; the orchestrator only reads the tag, the target resources, and
//! the confirmation metadata.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Discriminant of an edit operation.
///
/// The tag alone determines batching and applier selection; payloads are
/// never inspected for classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
	/// Text replacement inside a document.
	Text,
	/// File create, delete, or rename/move.
	File,
	/// Structured edit to a cell of a compound document.
	Cell,
	/// Opaque edit to a resource attachment.
	Attachment,
}

impl fmt::Display for EditKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Text => "text",
			Self::File => "file",
			Self::Cell => "cell",
			Self::Attachment => "attachment",
		};
		f.write_str(name)
	}
}

/// Human-visible annotations carried by an edit into review surfaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMetadata {
	/// Ask the user before applying this edit; forces a preview pass.
	pub needs_confirmation: bool,
	pub label: Option<String>,
	pub description: Option<String>,
}

/// Half-open character range within a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSpan {
	pub start: usize,
	pub end: usize,
}

/// Replacement of a character range with new text.
///
/// `range` of `None` replaces the whole document. Coordinates are
/// interpreted by the text applier, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextReplacement {
	pub range: Option<CharSpan>,
	pub text: String,
}

impl TextReplacement {
	/// Replaces the characters in `start..end` with `text`.
	pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
		Self {
			range: Some(CharSpan { start, end }),
			text: text.into(),
		}
	}

	/// Replaces the whole document with `text`.
	pub fn whole(text: impl Into<String>) -> Self {
		Self { range: None, text: text.into() }
	}
}

/// Behavior flags for file operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEditOptions {
	pub overwrite: bool,
	pub ignore_if_exists: bool,
	pub ignore_if_not_exists: bool,
	pub recursive: bool,
	/// Initial contents for created files.
	pub contents: Option<Vec<u8>>,
}

/// A text replacement in one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTextEdit {
	pub resource: Url,
	pub edit: TextReplacement,
	/// Document version the edit was computed against, when known.
	pub version_id: Option<i32>,
	pub metadata: Option<EditMetadata>,
}

/// A file create, delete, or rename/move.
///
/// Create carries only `new_resource`, delete only `old_resource`, and
/// rename/move both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFileEdit {
	pub old_resource: Option<Url>,
	pub new_resource: Option<Url>,
	pub options: FileEditOptions,
	pub metadata: Option<EditMetadata>,
}

impl ResourceFileEdit {
	/// The resource this operation is about: the new resource when present,
	/// else the old one. Covers create, delete, and rename uniformly.
	pub fn target(&self) -> Option<&Url> {
		self.new_resource.as_ref().or(self.old_resource.as_ref())
	}
}

/// A structured edit to a cell of a compound document.
///
/// The payload is opaque here; the cell applier interprets it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceCellEdit {
	pub resource: Url,
	pub cell_edit: Value,
	pub notebook_version_id: Option<i32>,
	pub metadata: Option<EditMetadata>,
}

/// An opaque edit to a resource attachment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceAttachmentEdit {
	pub resource: Url,
	pub edit: Value,
	pub metadata: Option<EditMetadata>,
}

/// One normalized, immutable edit operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EditOperation {
	Text(ResourceTextEdit),
	File(ResourceFileEdit),
	Cell(ResourceCellEdit),
	Attachment(ResourceAttachmentEdit),
}

impl EditOperation {
	/// Returns the kind tag used for batching and dispatch.
	pub fn kind(&self) -> EditKind {
		match self {
			Self::Text(_) => EditKind::Text,
			Self::File(_) => EditKind::File,
			Self::Cell(_) => EditKind::Cell,
			Self::Attachment(_) => EditKind::Attachment,
		}
	}

	pub fn metadata(&self) -> Option<&EditMetadata> {
		match self {
			Self::Text(edit) => edit.metadata.as_ref(),
			Self::File(edit) => edit.metadata.as_ref(),
			Self::Cell(edit) => edit.metadata.as_ref(),
			Self::Attachment(edit) => edit.metadata.as_ref(),
		}
	}

	/// True when the edit is flagged for interactive confirmation.
	pub fn needs_confirmation(&self) -> bool {
		self.metadata().is_some_and(|metadata| metadata.needs_confirmation)
	}
}
