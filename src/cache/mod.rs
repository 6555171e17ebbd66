//! Snapshot cache: bounds-checked positional patches over an ordered list.

mod snapshot;

pub use snapshot::{ApplyOutcome, BoundsViolation, SnapshotCache, SnapshotReader};
