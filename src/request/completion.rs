//! Single-assignment completion slots and the futures consumers await.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use tracing::{debug, error};

use crate::error::ScrollerError;

/// What a response future resolves to.
pub type Response<T> = Result<Vec<T>, ScrollerError>;

/// Producer side of a one-shot response.
///
/// A slot may be completed exactly once. A second attempt is a logic error:
/// it trips a debug assertion and is logged and ignored in release builds.
/// Dropping an unresolved slot resolves its future to
/// [`ScrollerError::Abandoned`].
#[derive(Debug)]
pub struct Completion<T> {
    tx: Option<oneshot::Sender<Response<T>>>,
}

impl<T> Completion<T> {
    /// Create a slot and the future observing it.
    pub fn new() -> (Self, ResponseFuture<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, ResponseFuture { rx })
    }

    /// Whether the slot has already been completed or abandoned.
    pub const fn is_resolved(&self) -> bool {
        self.tx.is_none()
    }

    /// Complete the slot. Returns `false` if it was already resolved.
    pub fn complete(&mut self, result: Response<T>) -> bool {
        debug_assert!(self.tx.is_some(), "completion slot resolved twice");
        let Some(tx) = self.tx.take() else {
            error!("completion slot resolved twice; dropping second result");
            return false;
        };
        if tx.send(result).is_err() {
            debug!("response future dropped before completion");
        }
        true
    }

    /// Drop the sender without a value.
    pub fn abandon(&mut self) {
        self.tx.take();
    }
}

/// Future returned to consumers for an Append or Refresh request.
///
/// Resolves exactly once. If the driver drops the request unanswered the
/// future resolves to [`ScrollerError::Abandoned`].
#[derive(Debug)]
#[must_use = "responses do nothing unless awaited"]
pub struct ResponseFuture<T> {
    rx: oneshot::Receiver<Response<T>>,
}

impl<T> ResponseFuture<T> {
    /// Take the response if it has already arrived, without blocking.
    pub fn try_take(&mut self) -> Option<Response<T>> {
        match self.rx.try_recv() {
            Ok(Some(response)) => Some(response),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ScrollerError::Abandoned)),
        }
    }
}

impl<T> Future for ResponseFuture<T> {
    type Output = Response<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ScrollerError::Abandoned)))
    }
}

/// Futures returned for an Append that may need a second answer.
#[derive(Debug)]
pub struct AppendResponse<T> {
    /// The primary answer.
    pub response: ResponseFuture<T>,
    /// The deferred first page, if the primary answer was ambiguous.
    pub follow_up: ResponseFuture<T>,
}
