//! Reconciliation: decide what an incoming update means for the outstanding
//! request.
//!
//! The driver has already applied the update to the snapshot when
//! [`handle_update`] runs; the handler only completes futures and raises
//! signals. It never touches the cache.
//!
//! | pending            | update                          | effect                                  |
//! |--------------------|---------------------------------|-----------------------------------------|
//! | none               | any                             | `invalidate`                            |
//! | Append             | `Append(items)`                 | response `Ok(items)`                    |
//! | Append             | `None`                          | response `Ok([])`, follow-up hint if empty |
//! | Append             | `Error(cause)`                  | response `Err(cause)`                   |
//! | Append             | any replace                     | response `Ok([])`                       |
//! | Append + follow-up | `ReplaceBefore { idx: 0, .. }`  | follow-up `Ok(items)`                   |
//! | Refresh            | `ReplaceFrom { idx: 0, .. }`    | response `Ok(items)`                    |
//! | Refresh            | anything else                   | response `Ok(snapshot)`                 |

use tracing::debug;

use crate::error::ScrollerError;
use crate::request::{PendingRequest, RequestKind, Response};
use crate::update::ScrollerUpdate;

/// Side-channel signals raised by [`handle_update`].
///
/// Both are synchronous and must not block.
pub trait ReconcileSignals {
    /// The cache changed without a matching request; re-read it.
    fn invalidate(&mut self);

    /// An Append came back empty against an empty cache. The store may not
    /// have finished initializing; a secondary fetch may be warranted.
    fn possible_append_follow_up(&mut self);
}

/// Complete `pending` (if any) according to `update` and the post-mutation
/// `snapshot`.
///
/// A request whose primary response already resolved and that only keeps a
/// follow-up open does not count as pending: updates that do not answer the
/// follow-up are treated as unsolicited.
pub fn handle_update<T, S>(
    pending: Option<&mut PendingRequest<T>>,
    update: ScrollerUpdate<T>,
    snapshot: &[T],
    signals: &mut S,
) where
    T: Clone,
    S: ReconcileSignals + ?Sized,
{
    let Some(request) = pending else {
        signals.invalidate();
        return;
    };

    if !request.awaiting_response() {
        if !resolve_lingering_follow_up(request, update) {
            signals.invalidate();
        }
        return;
    }

    match request.kind() {
        RequestKind::Append => handle_append(request, update, snapshot, signals),
        RequestKind::Refresh => handle_refresh(request, update, snapshot),
    }
}

fn handle_append<T, S>(
    request: &mut PendingRequest<T>,
    update: ScrollerUpdate<T>,
    snapshot: &[T],
    signals: &mut S,
) where
    S: ReconcileSignals + ?Sized,
{
    let mut follow_up_hinted = false;
    let result = match update {
        ScrollerUpdate::Append(items) => Ok(items),
        ScrollerUpdate::None => {
            if snapshot.is_empty() {
                signals.possible_append_follow_up();
                follow_up_hinted = true;
            }
            Ok(Vec::new())
        }
        ScrollerUpdate::Error(cause) => Err(ScrollerError::Scroller(cause)),
        ScrollerUpdate::ReplaceBefore { idx: 0, items } => {
            if let Some(slot) = request.follow_up_mut() {
                debug!(items = items.len(), "append follow-up answered by head prepend");
                slot.complete(Ok(items));
            }
            Ok(Vec::new())
        }
        ScrollerUpdate::ReplaceFrom { .. }
        | ScrollerUpdate::ReplaceBefore { .. }
        | ScrollerUpdate::ReplaceRange { .. } => Ok(Vec::new()),
    };
    request.response_mut().complete(result);

    if !follow_up_hinted {
        if let Some(slot) = request.follow_up_mut() {
            slot.complete(Err(ScrollerError::FollowUpNotNeeded));
        }
    }
}

fn handle_refresh<T: Clone>(
    request: &mut PendingRequest<T>,
    update: ScrollerUpdate<T>,
    snapshot: &[T],
) {
    let items = match update {
        ScrollerUpdate::ReplaceFrom { idx: 0, items } => items,
        ScrollerUpdate::Append(_)
        | ScrollerUpdate::ReplaceFrom { .. }
        | ScrollerUpdate::ReplaceBefore { .. }
        | ScrollerUpdate::ReplaceRange { .. }
        | ScrollerUpdate::None
        | ScrollerUpdate::Error(_) => snapshot.to_vec(),
    };
    request.response_mut().complete(Ok(items));
}

/// What a secondary Append's answer means for an earlier Append's follow-up.
///
/// A head prepend or an append carries the first page; an empty answer or an
/// indirect replace means the store really is empty; an error propagates.
pub(crate) fn secondary_answer<T: Clone>(update: &ScrollerUpdate<T>) -> Response<T> {
    match update {
        ScrollerUpdate::Append(items) | ScrollerUpdate::ReplaceBefore { idx: 0, items } => {
            Ok(items.clone())
        }
        ScrollerUpdate::Error(cause) => Err(ScrollerError::Scroller(cause.clone())),
        ScrollerUpdate::ReplaceFrom { .. }
        | ScrollerUpdate::ReplaceBefore { .. }
        | ScrollerUpdate::ReplaceRange { .. }
        | ScrollerUpdate::None => Ok(Vec::new()),
    }
}

/// Answer a follow-up left open by an earlier ambiguous Append.
///
/// Returns whether `update` was that answer.
pub(crate) fn resolve_lingering_follow_up<T>(
    request: &mut PendingRequest<T>,
    update: ScrollerUpdate<T>,
) -> bool {
    match (request.follow_up_mut(), update) {
        (Some(slot), ScrollerUpdate::ReplaceBefore { idx: 0, items }) => {
            debug!(items = items.len(), "append follow-up answered by head prepend");
            slot.complete(Ok(items));
            true
        }
        _ => false,
    }
}
