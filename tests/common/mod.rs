//! Common test utilities.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scroll_cache::{LiveScroller, ScrollerEvent, ScrollerUpdate, UpdateSink};

/// How long to wait for an event before declaring it absent.
pub const EVENT_TIMEOUT: Duration = Duration::from_millis(500);

/// Build owned strings from literals.
pub fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Call counters shared between a test and its scripted scroller.
#[derive(Debug, Default)]
pub struct Calls {
    pub fetches: AtomicUsize,
    pub refreshes: AtomicUsize,
}

impl Calls {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

/// Live scroller that answers fetches and refreshes from a script.
///
/// When a script runs dry the call is recorded but nothing is emitted, so
/// the test can push the answer itself through the driver's sink.
pub struct Scripted {
    sink: UpdateSink<String>,
    fetch_script: VecDeque<ScrollerUpdate<String>>,
    refresh_script: VecDeque<ScrollerUpdate<String>>,
    calls: Arc<Calls>,
}

impl Scripted {
    pub fn new(sink: UpdateSink<String>, calls: Arc<Calls>) -> Self {
        Self {
            sink,
            fetch_script: VecDeque::new(),
            refresh_script: VecDeque::new(),
            calls,
        }
    }

    pub fn on_fetch(mut self, update: ScrollerUpdate<String>) -> Self {
        self.fetch_script.push_back(update);
        self
    }

    pub fn on_refresh(mut self, update: ScrollerUpdate<String>) -> Self {
        self.refresh_script.push_back(update);
        self
    }
}

impl LiveScroller for Scripted {
    fn fetch_more(&mut self) {
        self.calls.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(update) = self.fetch_script.pop_front() {
            self.sink.emit(update).unwrap();
        }
    }

    fn refresh(&mut self) {
        self.calls.refreshes.fetch_add(1, Ordering::SeqCst);
        if let Some(update) = self.refresh_script.pop_front() {
            self.sink.emit(update).unwrap();
        }
    }
}

/// Wait for the next event.
pub fn next_event(events: &crossbeam_channel::Receiver<ScrollerEvent>) -> Option<ScrollerEvent> {
    events.recv_timeout(EVENT_TIMEOUT).ok()
}
