//! Shared storage behind signals and refs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Unique identifier for a reactive cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Generate a new unique cell ID.
    ///
    /// Zero is reserved for values that can never change.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

/// The identity of the value a cell currently holds.
///
/// Two reads observe the same identity iff no commit happened in between,
/// regardless of whether the committed value compared equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    cell: CellId,
    generation: u64,
}

impl Identity {
    /// Identity of a value that is never replaced.
    pub const FIXED: Identity = Identity {
        cell: CellId(0),
        generation: 0,
    };

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Slot<T> {
    value: Arc<T>,
    generation: u64,
}

/// The value behind a signal or ref.
///
/// Readers get a snapshot of the current value and run without the lock
/// held, so a reader may commit to the same store.
pub(crate) struct Store<T> {
    id: CellId,
    slot: RwLock<Slot<T>>,
}

impl<T> Store<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            id: CellId::new(),
            slot: RwLock::new(Slot {
                value: Arc::new(value),
                generation: 0,
            }),
        }
    }

    pub(crate) fn id(&self) -> CellId {
        self.id
    }

    pub(crate) fn identity(&self) -> Identity {
        Identity {
            cell: self.id,
            generation: self.slot.read().generation,
        }
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let snapshot = Arc::clone(&self.slot.read().value);
        f(&snapshot)
    }

    /// Replace the value, returning the previous one.
    pub(crate) fn commit(&self, value: T) -> Arc<T> {
        let mut slot = self.slot.write();
        slot.generation += 1;
        std::mem::replace(&mut slot.value, Arc::new(value))
    }
}
