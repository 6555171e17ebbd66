//! Errors surfaced to consumers through response futures.

use thiserror::Error;

use crate::request::RequestKind;
use crate::update::ScrollerFault;

/// Failure of an Append/Refresh response or of talking to the driver.
#[derive(Debug, Clone, Error)]
pub enum ScrollerError {
    /// The live scroller reported an error while an Append was outstanding.
    #[error("live scroller failed: {0}")]
    Scroller(#[source] ScrollerFault),

    /// Another request is still outstanding on this window.
    #[error("a {kind} request is already in flight")]
    RequestInFlight {
        /// Kind of the request that is still outstanding.
        kind: RequestKind,
    },

    /// The primary answer was unambiguous, so no follow-up will arrive.
    #[error("follow-up not needed")]
    FollowUpNotNeeded,

    /// The request was dropped before completion (window reset or driver stop).
    #[error("request abandoned before completion")]
    Abandoned,

    /// The driver thread is no longer running.
    #[error("scroller driver has shut down")]
    Shutdown,
}

impl From<ScrollerFault> for ScrollerError {
    fn from(fault: ScrollerFault) -> Self {
        Self::Scroller(fault)
    }
}
