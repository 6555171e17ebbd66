//! Driver configuration.

/// What happens to new requests while an Append follow-up is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowUpPolicy {
    /// New requests may be issued once the primary response resolved.
    #[default]
    Detached,
    /// The request stays in flight until its follow-up resolves as well.
    BlockNewRequests,
}

/// Configuration for a [`ScrollerDriver`](crate::ScrollerDriver).
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Name given to the driver thread.
    pub thread_name: String,
    /// Capacity of the outbound event channel, at least 2. The last free
    /// slot is kept for `Invalidated`; follow-up hints are dropped first.
    pub event_capacity: usize,
    /// Lifetime of Append follow-ups relative to new requests.
    pub follow_up_policy: FollowUpPolicy,
    /// Ask the live scroller for a full refresh when an update is rejected
    /// for bad bounds.
    pub refresh_on_rejected: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            thread_name: "scroll-cache-driver".to_string(),
            event_capacity: 16,
            follow_up_policy: FollowUpPolicy::Detached,
            refresh_on_rejected: false,
        }
    }
}

impl DriverConfig {
    /// Set the driver thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the follow-up policy.
    #[must_use]
    pub fn with_follow_up_policy(mut self, policy: FollowUpPolicy) -> Self {
        self.follow_up_policy = policy;
        self
    }

    /// Enable or disable refresh-on-rejected.
    #[must_use]
    pub fn with_refresh_on_rejected(mut self, enabled: bool) -> Self {
        self.refresh_on_rejected = enabled;
        self
    }
}
