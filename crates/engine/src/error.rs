//! Bulk edit failure taxonomy.

use thiserror::Error;

use emend_edit::NormalizeError;

use crate::applier::ApplierError;

/// Fatal failure of a bulk edit.
///
/// Cancellation is not represented here: a cancelled bulk edit returns its
/// partial result as a normal completion and the caller inspects the token.
#[derive(Debug, Error)]
pub enum BulkEditError {
	/// A raw descriptor matched no known edit kind. Raised before any side
	/// effect.
	#[error(transparent)]
	Normalize(#[from] NormalizeError),
	/// An applier failed mid-stream. Completed runs stay applied.
	#[error(transparent)]
	Applier(#[from] ApplierError),
}
