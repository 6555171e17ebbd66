//! Snapshot cache: the ordered, copy-on-write view of one window.
//!
//! The cache has exactly one writer (the driver thread, which owns the
//! [`SnapshotCache`]) and any number of readers holding a
//! [`SnapshotReader`]. Every applied update builds a fresh `Vec` and swaps it
//! in atomically, so readers never observe a half-applied patch.

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::update::ScrollerUpdate;

/// An index-bearing update that did not fit the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{update} [{from}, {to}) out of bounds for snapshot of length {len}")]
pub struct BoundsViolation {
    /// Variant name of the rejected update.
    pub update: &'static str,
    /// Lower bound as sent by the store.
    pub from: i64,
    /// Upper bound as sent by the store.
    pub to: i64,
    /// Snapshot length at the time of the rejection.
    pub len: usize,
}

/// Result of applying one update to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new snapshot was published.
    Applied,
    /// The update never mutates (`None` / `Error`).
    Unchanged,
    /// Bounds were invalid; the snapshot was left untouched.
    Rejected(BoundsViolation),
}

/// Lock-free read handle onto a [`SnapshotCache`].
#[derive(Debug)]
pub struct SnapshotReader<T> {
    current: Arc<ArcSwap<Vec<T>>>,
}

impl<T> Clone for SnapshotReader<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<T> SnapshotReader<T> {
    /// The most recently published snapshot.
    pub fn load(&self) -> Arc<Vec<T>> {
        self.current.load_full()
    }

    /// Length of the most recently published snapshot.
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Whether the most recently published snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

/// Single-writer ordered cache of one window's items.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    current: Arc<ArcSwap<Vec<T>>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Create a cache seeded with `items`.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(items)),
        }
    }

    /// A read handle sharing this cache's published snapshot.
    pub fn reader(&self) -> SnapshotReader<T> {
        SnapshotReader {
            current: Arc::clone(&self.current),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.current.load_full()
    }

    /// Replace the snapshot wholesale with an empty one (window changed).
    pub fn clear(&mut self) {
        self.current.store(Arc::new(Vec::new()));
    }
}

impl<T: Clone> SnapshotCache<T> {
    /// Apply `update`, publishing the new snapshot if it is a valid mutation.
    ///
    /// Never fails: `None` and `Error` are no-ops, and index-bearing
    /// variants whose bounds do not fit the current length are rejected
    /// without touching the snapshot (no clamping).
    pub fn apply(&mut self, update: &ScrollerUpdate<T>) -> ApplyOutcome {
        let current = self.current.load_full();
        match patch(&current, update) {
            Ok(Some(next)) => {
                self.current.store(Arc::new(next));
                ApplyOutcome::Applied
            }
            Ok(None) => ApplyOutcome::Unchanged,
            Err(violation) => ApplyOutcome::Rejected(violation),
        }
    }
}

/// Compute the patched sequence, or `None` for non-mutating updates.
fn patch<T: Clone>(
    current: &[T],
    update: &ScrollerUpdate<T>,
) -> Result<Option<Vec<T>>, BoundsViolation> {
    let len = current.len();
    let next = match update {
        ScrollerUpdate::Append(items) => splice(current, len, len, items),
        ScrollerUpdate::ReplaceFrom { idx, items } => {
            let at = checked_range(update, *idx, *idx, len)?.0;
            splice(current, at, len, items)
        }
        ScrollerUpdate::ReplaceBefore { idx, items } => {
            let at = checked_range(update, *idx, *idx, len)?.0;
            splice(current, 0, at, items)
        }
        ScrollerUpdate::ReplaceRange { from, to, items } => {
            let (from, to) = checked_range(update, *from, *to, len)?;
            splice(current, from, to, items)
        }
        ScrollerUpdate::None | ScrollerUpdate::Error(_) => return Ok(None),
    };
    Ok(Some(next))
}

/// Validate `0 <= from <= to <= len`.
fn checked_range<T>(
    update: &ScrollerUpdate<T>,
    from: i64,
    to: i64,
    len: usize,
) -> Result<(usize, usize), BoundsViolation> {
    let violation = BoundsViolation {
        update: update.name(),
        from,
        to,
        len,
    };
    let lo = usize::try_from(from).map_err(|_| violation)?;
    let hi = usize::try_from(to).map_err(|_| violation)?;
    if lo > hi || hi > len {
        return Err(violation);
    }
    Ok((lo, hi))
}

/// `current[..from] ++ items ++ current[to..]`
fn splice<T: Clone>(current: &[T], from: usize, to: usize, items: &[T]) -> Vec<T> {
    let mut next = Vec::with_capacity(current.len() - (to - from) + items.len());
    next.extend_from_slice(&current[..from]);
    next.extend_from_slice(items);
    next.extend_from_slice(&current[to..]);
    next
}
