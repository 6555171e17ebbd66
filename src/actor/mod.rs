//! Actor Model: one driver thread per window.
//!
//! The driver serializes everything that touches a window's state:
//! - **Live Scroller**: pushes updates through an [`UpdateSink`]
//! - **Consumer**: issues Append/Refresh requests and awaits their futures
//! - **Driver Loop**: applies each update, reconciles it, emits events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ScrollerUpdate   ┌──────────────┐
//! │ Live Scroller│ ────────────────▶ │              │
//! └──────────────┘                   │              │
//!        ▲  fetch_more / refresh     │ Driver Loop  │
//!        └────────────────────────── │              │
//!                                    │  (cache +    │
//! ┌──────────────┐  PendingRequest   │   pending)   │
//! │   Consumer   │ ────────────────▶ │              │
//! │              │ ◀──────────────── │              │
//! └──────────────┘  ScrollerEvent    └──────────────┘
//! ```

mod driver;
mod messages;
mod scroller;

pub use driver::ScrollerDriver;
pub use messages::ScrollerEvent;
pub use scroller::{LiveScroller, UpdateSink};
