//! Human-readable accounts of an edit list.

use std::collections::HashSet;

use crate::operation::EditOperation;

/// Screen-reader summary of a classified edit list.
///
/// Counts text-edit operations, distinct text-edit resources, and distinct
/// file-operation targets (the new resource when present, else the old one,
/// so create, delete, and rename count uniformly). Cell and attachment
/// edits contribute to neither count.
///
/// The summary describes what the bulk edit was built from, not what ran:
/// a cancelled bulk edit reports the same text as a completed one.
pub fn aria_summary(edits: &[EditOperation]) -> String {
	let mut text_edit_count = 0usize;
	let mut text_resources: HashSet<&str> = HashSet::new();
	let mut file_targets: HashSet<&str> = HashSet::new();

	for edit in edits {
		match edit {
			EditOperation::Text(edit) => {
				text_edit_count += 1;
				text_resources.insert(edit.resource.as_str());
			}
			EditOperation::File(edit) => {
				if let Some(target) = edit.target() {
					file_targets.insert(target.as_str());
				}
			}
			EditOperation::Cell(_) | EditOperation::Attachment(_) => {}
		}
	}

	if edits.is_empty() {
		"Made no edits".to_string()
	} else if file_targets.is_empty() {
		if text_resources.len() == 1 {
			format!("Made {text_edit_count} text edits in one file")
		} else {
			format!("Made {text_edit_count} text edits in {} files", text_resources.len())
		}
	} else {
		format!(
			"Made {text_edit_count} text edits in {} files, also created or removed {} files",
			text_resources.len(),
			file_targets.len()
		)
	}
}
