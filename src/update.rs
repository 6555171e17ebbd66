//! Update vocabulary emitted by a live scroller.
//!
//! Every change in the backing store, solicited or not, arrives as one
//! [`ScrollerUpdate`]. Updates are ephemeral: the driver applies them to the
//! snapshot, reconciles them against the outstanding request, and drops them.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Opaque cause attached to [`ScrollerUpdate::Error`].
///
/// Cheap to clone; the underlying transport error is kept behind an `Arc`
/// and exposed through [`Error::source`].
#[derive(Clone)]
pub struct ScrollerFault(Arc<dyn Error + Send + Sync + 'static>);

impl ScrollerFault {
    /// Wrap any transport error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Build a fault from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(Arc::new(FaultMessage(message.into())))
    }

    /// Borrow the wrapped error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Debug for ScrollerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScrollerFault").field(&self.0.to_string()).finish()
    }
}

impl fmt::Display for ScrollerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for ScrollerFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}

#[derive(Debug)]
struct FaultMessage(String);

impl fmt::Display for FaultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for FaultMessage {}

/// One patch (or non-patch signal) from the backing store.
///
/// Indices are signed so that a desynchronized store reporting a negative
/// position is representable and can be rejected rather than wrapped.
/// Ranges are half-open and 0-indexed against the snapshot length the store
/// believes the cache currently has.
#[derive(Debug, Clone)]
pub enum ScrollerUpdate<T> {
    /// Items to add after the current tail.
    Append(Vec<T>),

    /// Replace everything at and after `idx`.
    ReplaceFrom {
        /// First replaced position.
        idx: i64,
        /// Replacement items.
        items: Vec<T>,
    },

    /// Replace everything strictly before `idx`.
    ReplaceBefore {
        /// First retained position.
        idx: i64,
        /// Replacement items.
        items: Vec<T>,
    },

    /// Replace the half-open range `[from, to)`.
    ReplaceRange {
        /// First replaced position.
        from: i64,
        /// First retained position after the range.
        to: i64,
        /// Replacement items.
        items: Vec<T>,
    },

    /// The store looked and found nothing new.
    None,

    /// The store failed to produce a change.
    Error(ScrollerFault),
}

impl<T> ScrollerUpdate<T> {
    /// Short variant name, used in log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::ReplaceFrom { .. } => "replace_from",
            Self::ReplaceBefore { .. } => "replace_before",
            Self::ReplaceRange { .. } => "replace_range",
            Self::None => "none",
            Self::Error(_) => "error",
        }
    }

    /// Whether this update can ever change the snapshot.
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::None | Self::Error(_))
    }
}
