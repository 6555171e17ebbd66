//! The one outstanding consumer request per window.

use std::fmt;

use super::completion::{AppendResponse, Completion, ResponseFuture};
use crate::error::ScrollerError;

/// Kind of consumer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Fetch more items after the tail.
    Append,
    /// Re-read the current window.
    Refresh,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => f.write_str("append"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// A consumer call awaiting fulfillment.
///
/// Holds the primary `response` slot and, for some Append requests, a
/// `follow_up` slot answered by a later head prepend.
#[derive(Debug)]
pub struct PendingRequest<T> {
    kind: RequestKind,
    response: Completion<T>,
    follow_up: Option<Completion<T>>,
}

impl<T> PendingRequest<T> {
    /// A plain Append request.
    pub fn append() -> (Self, ResponseFuture<T>) {
        Self::single(RequestKind::Append)
    }

    /// An Append request that also carries a follow-up slot.
    pub fn append_with_follow_up() -> (Self, AppendResponse<T>) {
        let (response, response_fut) = Completion::new();
        let (follow_up, follow_up_fut) = Completion::new();
        let request = Self {
            kind: RequestKind::Append,
            response,
            follow_up: Some(follow_up),
        };
        (
            request,
            AppendResponse {
                response: response_fut,
                follow_up: follow_up_fut,
            },
        )
    }

    /// A Refresh request.
    pub fn refresh() -> (Self, ResponseFuture<T>) {
        Self::single(RequestKind::Refresh)
    }

    fn single(kind: RequestKind) -> (Self, ResponseFuture<T>) {
        let (response, fut) = Completion::new();
        (
            Self {
                kind,
                response,
                follow_up: None,
            },
            fut,
        )
    }

    /// Request kind.
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Whether the primary response is still outstanding.
    pub const fn awaiting_response(&self) -> bool {
        !self.response.is_resolved()
    }

    /// Whether a follow-up slot exists and is still outstanding.
    pub fn awaiting_follow_up(&self) -> bool {
        self.follow_up.as_ref().is_some_and(|slot| !slot.is_resolved())
    }

    /// Whether nothing remains to be answered.
    pub fn is_retired(&self) -> bool {
        !self.awaiting_response() && !self.awaiting_follow_up()
    }

    pub(crate) fn response_mut(&mut self) -> &mut Completion<T> {
        &mut self.response
    }

    pub(crate) fn follow_up_mut(&mut self) -> Option<&mut Completion<T>> {
        self.follow_up.as_mut().filter(|slot| !slot.is_resolved())
    }

    /// Resolve every unresolved slot with `error`.
    pub(crate) fn fail(&mut self, error: &ScrollerError) {
        if !self.response.is_resolved() {
            self.response.complete(Err(error.clone()));
        }
        if let Some(slot) = self.follow_up_mut() {
            slot.complete(Err(error.clone()));
        }
    }

    /// Drop every unresolved slot; their futures resolve to `Abandoned`.
    pub fn abandon(&mut self) {
        self.response.abandon();
        if let Some(slot) = self.follow_up.as_mut() {
            slot.abandon();
        }
    }
}
