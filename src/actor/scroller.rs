//! The live scroller seam: the external push source of updates.

use std::fmt;

use crossbeam_channel::Sender;

use super::messages::DriverCommand;
use crate::error::ScrollerError;
use crate::update::ScrollerUpdate;

/// Backing-store query that pushes [`ScrollerUpdate`]s into an
/// [`UpdateSink`].
///
/// Both methods run on the driver thread and must not block; the answer
/// arrives later (or immediately) through the sink.
pub trait LiveScroller: Send + 'static {
    /// Fetch the next page after the current tail.
    fn fetch_more(&mut self);

    /// Re-read the whole window.
    fn refresh(&mut self);
}

/// Handle through which a live scroller delivers updates.
///
/// Cheap to clone; usable from any thread. Updates are processed strictly
/// in the order they are emitted. A sink is bound to the window it was
/// created for: after a reset, updates from older sinks are discarded.
pub struct UpdateSink<T> {
    tx: Sender<DriverCommand<T>>,
    generation: u64,
}

impl<T> Clone for UpdateSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            generation: self.generation,
        }
    }
}

impl<T> fmt::Debug for UpdateSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateSink")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<T> UpdateSink<T> {
    pub(crate) const fn new(tx: Sender<DriverCommand<T>>, generation: u64) -> Self {
        Self { tx, generation }
    }

    /// Window generation this sink feeds.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver one update to the driver.
    pub fn emit(&self, update: ScrollerUpdate<T>) -> Result<(), ScrollerError> {
        self.tx
            .send(DriverCommand::Update {
                generation: self.generation,
                update,
            })
            .map_err(|_| ScrollerError::Shutdown)
    }
}
