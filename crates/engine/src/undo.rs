//! Undo/redo grouping shared across the edits of one bulk operation.
//!
//! Every edit applied under the same [`UndoRedoGroup`] is undone and redone
//! as a unit. Groups live in a process-wide registry while a bulk edit is
//! writing into them; sequential bulk edits may opt into an active group by
//! id, stacking their undo histories together.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Token shared by the edits belonging to one logical bulk edit.
#[derive(Debug)]
pub struct UndoRedoGroup {
	id: u64,
	order: AtomicU64,
}

impl UndoRedoGroup {
	pub fn new() -> Self {
		Self {
			id: NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed),
			order: AtomicU64::new(1),
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	/// Returns the next ordinal within the group. Appliers use it to
	/// sequence their undo entries.
	pub fn next_order(&self) -> u64 {
		self.order.fetch_add(1, Ordering::Relaxed)
	}
}

impl Default for UndoRedoGroup {
	fn default() -> Self {
		Self::new()
	}
}

/// Identity of the caller issuing undoable edits, with its own ordering.
#[derive(Debug)]
pub struct UndoRedoSource {
	id: u64,
	order: AtomicU64,
}

impl UndoRedoSource {
	pub fn new() -> Self {
		Self {
			id: NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed),
			order: AtomicU64::new(1),
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn next_order(&self) -> u64 {
		self.order.fetch_add(1, Ordering::Relaxed)
	}
}

impl Default for UndoRedoSource {
	fn default() -> Self {
		Self::new()
	}
}

struct GroupEntry {
	slot: u64,
	group: Arc<UndoRedoGroup>,
}

/// Registry of groups with a bulk edit currently in flight.
///
/// Mutated only through [`ActiveGroups::acquire`] and guard drop; the find
/// and the registration happen under one lock acquisition, so concurrent
/// callers never observe a half-registered group.
pub(crate) struct ActiveGroups {
	entries: Arc<Mutex<Vec<GroupEntry>>>,
	next_slot: AtomicU64,
}

impl ActiveGroups {
	pub fn new() -> Self {
		Self {
			entries: Arc::new(Mutex::new(Vec::new())),
			next_slot: AtomicU64::new(1),
		}
	}

	/// Reuses the active group with `id` when one exists, else creates a
	/// fresh group. The group stays registered until the guard drops.
	pub fn acquire(&self, id: Option<u64>) -> GroupGuard {
		let mut entries = self.entries.lock();
		let group = id
			.and_then(|id| {
				entries
					.iter()
					.find(|entry| entry.group.id() == id)
					.map(|entry| Arc::clone(&entry.group))
			})
			.unwrap_or_default();
		let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
		entries.push(GroupEntry {
			slot,
			group: Arc::clone(&group),
		});
		GroupGuard {
			entries: Arc::clone(&self.entries),
			slot,
			group,
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}
}

/// Scoped registration of one group; releases exactly once on drop.
pub(crate) struct GroupGuard {
	entries: Arc<Mutex<Vec<GroupEntry>>>,
	slot: u64,
	group: Arc<UndoRedoGroup>,
}

impl GroupGuard {
	pub fn group(&self) -> &Arc<UndoRedoGroup> {
		&self.group
	}
}

impl Drop for GroupGuard {
	fn drop(&mut self) {
		let mut entries = self.entries.lock();
		if let Some(position) = entries.iter().position(|entry| entry.slot == self.slot) {
			entries.remove(position);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn group_ids_are_unique() {
		assert_ne!(UndoRedoGroup::new().id(), UndoRedoGroup::new().id());
	}

	#[test]
	fn group_order_is_monotonic() {
		let group = UndoRedoGroup::new();
		let first = group.next_order();
		assert!(group.next_order() > first);
	}

	#[test]
	fn acquire_without_id_creates_fresh_groups() {
		let active = ActiveGroups::new();
		let a = active.acquire(None);
		let b = active.acquire(None);
		assert_ne!(a.group().id(), b.group().id());
		assert_eq!(active.len(), 2);
	}

	#[test]
	fn acquire_reuses_active_group_by_id() {
		let active = ActiveGroups::new();
		let first = active.acquire(None);
		let id = first.group().id();
		let second = active.acquire(Some(id));
		assert!(Arc::ptr_eq(first.group(), second.group()));
		drop(second);
		drop(first);
		assert_eq!(active.len(), 0);
	}

	#[test]
	fn released_group_is_not_reused() {
		let active = ActiveGroups::new();
		let id = {
			let guard = active.acquire(None);
			guard.group().id()
		};
		let fresh = active.acquire(Some(id));
		assert_ne!(fresh.group().id(), id);
	}
}
