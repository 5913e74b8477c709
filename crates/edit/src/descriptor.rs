//! Raw edit descriptors and their normalization.
//!
//! Callers hand the engine loosely-shaped [`EditDescriptor`]s, possibly
//! decoded straight off a protocol boundary. [`normalize`] lifts them into
//! the canonical [`EditOperation`] form, preserving length and relative
//! order, and rejects anything that matches none of the known shapes before
//! any side effect takes place.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::operation::{
	EditMetadata, EditOperation, FileEditOptions, ResourceAttachmentEdit, ResourceCellEdit,
	ResourceFileEdit, ResourceTextEdit, TextReplacement,
};

/// Errors occurring during descriptor normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
	/// The descriptor at `index` matches none of the known edit shapes.
	#[error("unsupported edit kind at index {index}")]
	UnsupportedEditKind { index: usize },
}

/// A raw, possibly under-specified edit description.
///
/// Which fields are populated decides the edit's kind; see [`normalize`].
/// The convenience constructors build well-formed descriptors for each kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditDescriptor {
	pub resource: Option<Url>,
	pub text_edit: Option<TextReplacement>,
	pub version_id: Option<i32>,
	pub old_resource: Option<Url>,
	pub new_resource: Option<Url>,
	pub options: Option<FileEditOptions>,
	pub cell_edit: Option<Value>,
	pub notebook_version_id: Option<i32>,
	pub attachment_edit: Option<Value>,
	pub metadata: Option<EditMetadata>,
}

impl EditDescriptor {
	/// Text replacement in `resource`.
	pub fn text(resource: Url, edit: TextReplacement) -> Self {
		Self {
			resource: Some(resource),
			text_edit: Some(edit),
			..Self::default()
		}
	}

	/// File creation.
	pub fn create_file(resource: Url, options: FileEditOptions) -> Self {
		Self {
			new_resource: Some(resource),
			options: Some(options),
			..Self::default()
		}
	}

	/// File deletion.
	pub fn delete_file(resource: Url, options: FileEditOptions) -> Self {
		Self {
			old_resource: Some(resource),
			options: Some(options),
			..Self::default()
		}
	}

	/// File rename/move.
	pub fn rename_file(old_resource: Url, new_resource: Url, options: FileEditOptions) -> Self {
		Self {
			old_resource: Some(old_resource),
			new_resource: Some(new_resource),
			options: Some(options),
			..Self::default()
		}
	}

	/// Structured cell edit in the compound document at `resource`.
	pub fn cell(resource: Url, cell_edit: Value) -> Self {
		Self {
			resource: Some(resource),
			cell_edit: Some(cell_edit),
			..Self::default()
		}
	}

	/// Opaque attachment edit on `resource`.
	pub fn attachment(resource: Url, edit: Value) -> Self {
		Self {
			resource: Some(resource),
			attachment_edit: Some(edit),
			..Self::default()
		}
	}

	pub fn with_metadata(mut self, metadata: EditMetadata) -> Self {
		self.metadata = Some(metadata);
		self
	}

	pub fn with_version(mut self, version_id: i32) -> Self {
		self.version_id = Some(version_id);
		self
	}

	fn classify(self) -> Option<EditOperation> {
		let Self {
			resource,
			text_edit,
			version_id,
			old_resource,
			new_resource,
			options,
			cell_edit,
			notebook_version_id,
			attachment_edit,
			metadata,
		} = self;

		if let Some(edit) = text_edit {
			let resource = resource?;
			return Some(EditOperation::Text(ResourceTextEdit {
				resource,
				edit,
				version_id,
				metadata,
			}));
		}
		if let Some(cell_edit) = cell_edit {
			let resource = resource?;
			return Some(EditOperation::Cell(ResourceCellEdit {
				resource,
				cell_edit,
				notebook_version_id,
				metadata,
			}));
		}
		if let Some(edit) = attachment_edit {
			let resource = resource?;
			return Some(EditOperation::Attachment(ResourceAttachmentEdit {
				resource,
				edit,
				metadata,
			}));
		}
		if old_resource.is_some() || new_resource.is_some() {
			return Some(EditOperation::File(ResourceFileEdit {
				old_resource,
				new_resource,
				options: options.unwrap_or_default(),
				metadata,
			}));
		}
		None
	}
}

/// Lifts raw descriptors into canonical edit operations.
///
/// Output has the same length and relative order as the input. Pure; the
/// first unclassifiable descriptor fails the whole batch.
///
/// # Errors
///
/// Returns [`NormalizeError::UnsupportedEditKind`] with the offending index.
pub fn normalize(descriptors: Vec<EditDescriptor>) -> Result<Vec<EditOperation>, NormalizeError> {
	descriptors
		.into_iter()
		.enumerate()
		.map(|(index, descriptor)| {
			descriptor
				.classify()
				.ok_or(NormalizeError::UnsupportedEditKind { index })
		})
		.collect()
}
