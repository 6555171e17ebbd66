//! Driver: the single writer for one window.
//!
//! The driver thread owns the [`SnapshotCache`], the live scroller and the
//! pending request. Updates from the scroller and requests from the consumer
//! arrive on one channel, so every apply-then-reconcile step completes before
//! the next command is looked at.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use super::messages::{DriverCommand, ScrollerEvent, ScrollerFactory};
use super::scroller::{LiveScroller, UpdateSink};
use crate::cache::{ApplyOutcome, SnapshotCache, SnapshotReader};
use crate::config::{DriverConfig, FollowUpPolicy};
use crate::error::ScrollerError;
use crate::reconcile::{self, ReconcileSignals};
use crate::request::{AppendResponse, PendingRequest, RequestKind, ResponseFuture};
use crate::update::ScrollerUpdate;

/// Consumer handle onto a running driver.
///
/// Dropping the handle stops the driver thread; outstanding futures resolve
/// to [`ScrollerError::Abandoned`].
pub struct ScrollerDriver<T> {
    /// Command sender (updates share this channel via `UpdateSink`).
    commands: Sender<DriverCommand<T>>,
    /// Outbound notifications.
    events: Receiver<ScrollerEvent>,
    /// Lock-free view of the snapshot.
    reader: SnapshotReader<T>,
    /// Window generation handed to new sinks.
    generation: AtomicU64,
    /// Driver thread handle.
    handle: Option<JoinHandle<()>>,
}

impl<T> ScrollerDriver<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn a driver with default configuration.
    ///
    /// `make_scroller` receives the sink the scroller must push updates into.
    pub fn spawn<S, F>(make_scroller: F) -> io::Result<Self>
    where
        S: LiveScroller,
        F: FnOnce(UpdateSink<T>) -> S,
    {
        Self::spawn_with_config(DriverConfig::default(), make_scroller)
    }

    /// Spawn a driver with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the driver thread.
    pub fn spawn_with_config<S, F>(config: DriverConfig, make_scroller: F) -> io::Result<Self>
    where
        S: LiveScroller,
        F: FnOnce(UpdateSink<T>) -> S,
    {
        let (command_tx, command_rx) = unbounded();
        // One slot stays reserved for `Invalidated`.
        let (event_tx, event_rx) = bounded(config.event_capacity.max(2));

        let scroller = make_scroller(UpdateSink::new(command_tx.clone(), 0));
        let cache = SnapshotCache::new();
        let reader = cache.reader();

        let thread_name = config.thread_name.clone();
        let driver = DriverLoop {
            cache,
            scroller: Box::new(scroller),
            generation: 0,
            commands: command_tx.clone(),
            active: None,
            lingering: None,
            settle_lingering: false,
            events: event_tx,
            config,
        };
        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || driver.run(&command_rx))?;

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            reader,
            generation: AtomicU64::new(0),
            handle: Some(handle),
        })
    }

    /// Ask for the next page after the tail.
    pub fn request_append(&self) -> ResponseFuture<T> {
        let (request, response) = PendingRequest::append();
        self.submit(request);
        response
    }

    /// Ask for the next page, with a follow-up slot for the case where the
    /// answer is empty because the store is still initializing.
    pub fn request_append_with_follow_up(&self) -> AppendResponse<T> {
        let (request, response) = PendingRequest::append_with_follow_up();
        self.submit(request);
        response
    }

    /// Ask for an up-to-date view of the window. Never fails on store errors.
    pub fn request_refresh(&self) -> ResponseFuture<T> {
        let (request, response) = PendingRequest::refresh();
        self.submit(request);
        response
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.reader.load()
    }

    /// A cloneable read handle for renderers on other threads.
    pub fn reader(&self) -> SnapshotReader<T> {
        self.reader.clone()
    }

    /// Outbound notifications (invalidate, possible follow-up).
    ///
    /// Use this with `select!` alongside other event sources.
    #[inline]
    pub const fn events(&self) -> &Receiver<ScrollerEvent> {
        &self.events
    }

    /// An update sink bound to the current window.
    pub fn sink(&self) -> UpdateSink<T> {
        UpdateSink::new(self.commands.clone(), self.generation.load(Ordering::Acquire))
    }

    /// Switch to a new window.
    ///
    /// The snapshot is emptied, any outstanding request is abandoned, and
    /// the scroller is replaced by the one `make_scroller` builds (on the
    /// driver thread). Updates still arriving through sinks of the previous
    /// window are discarded.
    pub fn reset<S, F>(&self, make_scroller: F) -> Result<(), ScrollerError>
    where
        S: LiveScroller,
        F: FnOnce(UpdateSink<T>) -> S + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let make_scroller: ScrollerFactory<T> =
            Box::new(move |sink| Box::new(make_scroller(sink)) as Box<dyn LiveScroller>);
        self.commands
            .send(DriverCommand::Reset {
                generation,
                make_scroller,
            })
            .map_err(|_| ScrollerError::Shutdown)
    }

    /// Stop the driver and wait for its thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn submit(&self, request: PendingRequest<T>) {
        if let Err(err) = self.commands.send(DriverCommand::Request(request)) {
            if let DriverCommand::Request(mut request) = err.into_inner() {
                request.fail(&ScrollerError::Shutdown);
            }
        }
    }
}

impl<T> ScrollerDriver<T> {
    fn stop(&mut self) {
        let _ = self.commands.send(DriverCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl<T> Drop for ScrollerDriver<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the driver thread.
struct DriverLoop<T> {
    cache: SnapshotCache<T>,
    scroller: Box<dyn LiveScroller>,
    /// Window generation; updates stamped with another one are stale.
    generation: u64,
    /// For building sinks of later windows.
    commands: Sender<DriverCommand<T>>,
    /// Request whose primary response is outstanding (or, under
    /// `BlockNewRequests`, whose follow-up is).
    active: Option<PendingRequest<T>>,
    /// Append whose follow-up is still open while another request runs.
    lingering: Option<PendingRequest<T>>,
    /// The active Append was issued to settle `lingering`'s follow-up.
    settle_lingering: bool,
    events: Sender<ScrollerEvent>,
    config: DriverConfig,
}

impl<T: Clone> DriverLoop<T> {
    fn run(mut self, commands: &Receiver<DriverCommand<T>>) {
        debug!(thread = %self.config.thread_name, "scroller driver started");
        for command in commands {
            match command {
                DriverCommand::Update { generation, update } => {
                    if generation == self.generation {
                        self.on_update(update);
                    } else {
                        debug!(
                            generation,
                            current = self.generation,
                            update = update.name(),
                            "discarding update from a previous window"
                        );
                    }
                }
                DriverCommand::Request(request) => self.on_request(request),
                DriverCommand::Reset {
                    generation,
                    make_scroller,
                } => self.on_reset(generation, make_scroller),
                DriverCommand::Shutdown => break,
            }
        }
        self.abandon_all();
        debug!(thread = %self.config.thread_name, "scroller driver stopped");
    }

    fn on_request(&mut self, mut request: PendingRequest<T>) {
        let kind = request.kind();
        if let Some(active) = &self.active {
            // Under `BlockNewRequests` an Append whose follow-up is still open
            // stays active; a further Append is the secondary fetch that
            // settles it.
            if kind != RequestKind::Append || active.awaiting_response() {
                warn!(%kind, in_flight = %active.kind(), "rejecting request while another is in flight");
                request.fail(&ScrollerError::RequestInFlight {
                    kind: active.kind(),
                });
                return;
            }
            debug!("secondary append accepted to settle outstanding follow-up");
            let waiting = self.active.take();
            if let Some(mut superseded) = std::mem::replace(&mut self.lingering, waiting) {
                superseded.abandon();
            }
            self.settle_lingering = true;
        } else if request.awaiting_follow_up() {
            if let Some(mut superseded) = self.lingering.take() {
                debug!("newer append supersedes lingering follow-up");
                superseded.abandon();
            }
        }

        debug!(%kind, "request accepted");
        self.active = Some(request);
        match kind {
            RequestKind::Append => self.scroller.fetch_more(),
            RequestKind::Refresh => self.scroller.refresh(),
        }
    }

    fn on_update(&mut self, update: ScrollerUpdate<T>) {
        let name = update.name();
        let outcome = self.cache.apply(&update);
        if let ApplyOutcome::Rejected(violation) = outcome {
            warn!(error = %violation, "dropping out-of-bounds update");
            if self.config.refresh_on_rejected {
                self.scroller.refresh();
            }
        }
        if let ScrollerUpdate::Error(cause) = &update {
            if self.active.is_none() {
                warn!(error = %cause, "live scroller error with no outstanding request");
            }
        }

        let snapshot = self.cache.snapshot();
        let mut signals = EventSignals {
            events: &self.events,
        };

        if let Some(active) = self.active.as_mut() {
            if let Some(lingering) = self.lingering.as_mut() {
                if self.settle_lingering {
                    if let Some(slot) = lingering.follow_up_mut() {
                        debug!("append follow-up settled by secondary fetch");
                        slot.complete(reconcile::secondary_answer(&update));
                    }
                } else if matches!(update, ScrollerUpdate::ReplaceBefore { idx: 0, .. }) {
                    reconcile::resolve_lingering_follow_up(lingering, update.clone());
                }
            }
            self.settle_lingering = false;
            reconcile::handle_update(Some(active), update, &snapshot, &mut signals);
        } else {
            reconcile::handle_update(self.lingering.as_mut(), update, &snapshot, &mut signals);
        }

        debug!(update = name, len = snapshot.len(), "update reconciled");
        self.retire();
    }

    fn on_reset(&mut self, generation: u64, make_scroller: ScrollerFactory<T>) {
        if generation <= self.generation {
            debug!(generation, current = self.generation, "ignoring out-of-order reset");
            return;
        }
        debug!(generation, "window reset");
        self.abandon_all();
        self.cache.clear();
        self.generation = generation;
        self.scroller = make_scroller(UpdateSink::new(self.commands.clone(), generation));
        EventSignals {
            events: &self.events,
        }
        .invalidate();
    }

    /// Move finished requests out of the active/lingering slots.
    fn retire(&mut self) {
        if self.lingering.as_ref().is_some_and(PendingRequest::is_retired) {
            self.lingering = None;
        }

        let Some(active) = self.active.take() else {
            return;
        };
        if active.is_retired() {
            debug!(kind = %active.kind(), "request completed");
        } else if active.awaiting_response()
            || self.config.follow_up_policy == FollowUpPolicy::BlockNewRequests
        {
            self.active = Some(active);
        } else {
            debug!("primary response sent; follow-up detached");
            if let Some(mut superseded) = self.lingering.replace(active) {
                superseded.abandon();
            }
        }
    }

    fn abandon_all(&mut self) {
        for mut request in self.active.take().into_iter().chain(self.lingering.take()) {
            request.abandon();
        }
        self.settle_lingering = false;
    }
}

/// Forwards reconciliation signals to the consumer's event channel.
///
/// The last free slot of the channel is kept for `Invalidated`, so when a
/// send finds the channel full an invalidation is already queued and the
/// new one coalesces into it.
struct EventSignals<'a> {
    events: &'a Sender<ScrollerEvent>,
}

impl EventSignals<'_> {
    fn send(&self, event: ScrollerEvent) {
        match self.events.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => debug!(?event, "event channel full; coalesced"),
        }
    }
}

impl ReconcileSignals for EventSignals<'_> {
    fn invalidate(&mut self) {
        self.send(ScrollerEvent::Invalidated);
    }

    fn possible_append_follow_up(&mut self) {
        let capacity = self.events.capacity().unwrap_or(usize::MAX);
        if self.events.len() + 1 >= capacity {
            debug!("event channel nearly full; dropping follow-up hint");
            return;
        }
        self.send(ScrollerEvent::PossibleAppendFollowUp);
    }
}
