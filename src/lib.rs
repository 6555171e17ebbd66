//! # Scroll Cache
//!
//! Windowed list cache and update reconciliation for infinite-scroll views
//! backed by a live, push-driven store.
//!
//! The store can change at any time, and the only way to learn the answer
//! to "give me more" or "refresh" is the same stream of updates that also
//! carries unsolicited changes. This crate classifies every update against
//! the one outstanding request and decides how to patch the snapshot, which
//! future to complete, and whether to tell observers to re-read.
//!
//! ## Core Concepts
//!
//! - **Snapshot cache**: bounds-checked positional patches, published copy-on-write
//! - **Reconciliation**: pure decision table from (request, update, snapshot) to completions
//! - **Single writer**: one driver thread per window owns cache and request state
//! - **Follow-up**: a second answer for an Append that came back ambiguously empty
//!
//! ## Example
//!
//! ```rust,ignore
//! use scroll_cache::{LiveScroller, ScrollerDriver, ScrollerEvent};
//!
//! let driver = ScrollerDriver::spawn(|sink| MailboxQuery::new(sink))?;
//! let page = futures::executor::block_on(driver.request_append())?;
//!
//! for event in driver.events() {
//!     if event == ScrollerEvent::Invalidated {
//!         render(&driver.snapshot());
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod cache;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod request;
pub mod update;

// Re-exports for convenience
pub use actor::{LiveScroller, ScrollerDriver, ScrollerEvent, UpdateSink};
pub use cache::{ApplyOutcome, BoundsViolation, SnapshotCache, SnapshotReader};
pub use config::{DriverConfig, FollowUpPolicy};
pub use error::ScrollerError;
pub use reconcile::{handle_update, ReconcileSignals};
pub use request::{AppendResponse, PendingRequest, RequestKind, ResponseFuture};
pub use update::{ScrollerFault, ScrollerUpdate};
