//! Pending requests: one outstanding Append or Refresh and its completion slots.

mod completion;
mod pending;

pub use completion::{AppendResponse, Completion, Response, ResponseFuture};
pub use pending::{PendingRequest, RequestKind};
