//! Message types for driver communication.
//!
//! These enums define the protocol between the driver thread, the live
//! scroller feeding it, and the consumer listening to it.

use super::scroller::{LiveScroller, UpdateSink};
use crate::request::PendingRequest;
use crate::update::ScrollerUpdate;

/// Builds the live scroller for a new window, on the driver thread.
pub(crate) type ScrollerFactory<T> = Box<dyn FnOnce(UpdateSink<T>) -> Box<dyn LiveScroller> + Send>;

/// Commands sent to the driver thread.
///
/// Updates and requests share one channel so the driver sees them in a
/// single total order.
pub(crate) enum DriverCommand<T> {
    /// A change (or non-change) from the live scroller bound to window
    /// `generation`.
    Update {
        /// Window the emitting sink was created for.
        generation: u64,
        /// The change itself.
        update: ScrollerUpdate<T>,
    },

    /// A new consumer request.
    Request(PendingRequest<T>),

    /// The window identity changed; start over empty with a new scroller.
    Reset {
        /// Generation of the new window.
        generation: u64,
        /// Scroller for the new window.
        make_scroller: ScrollerFactory<T>,
    },

    /// Stop the driver thread.
    Shutdown,
}

/// Notifications from the driver to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollerEvent {
    /// The snapshot changed without a matching request (or the window was
    /// reset). Re-read it.
    Invalidated,

    /// An Append came back empty against an empty snapshot. The store may
    /// still be initializing; consider scheduling another fetch.
    PossibleAppendFollowUp,
}
