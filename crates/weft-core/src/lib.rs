//! Core systems for weft.
//!
//! This crate holds the pieces of the toolkit that do not depend on geometry or
//! rendering:
//!
//! - [`WidgetId`] - generational id of a widget node in the arena
//! - [`Signal`] - synchronous notifications with connect/disconnect
//! - [`Hook`] and [`Decision`] - cancelable "before-change" notifications
//! - [`Clock`] - injectable time source for double-click and key repeat
//! - [`WeftError`] - contract violations reported by tree operations
//! - [`logging`] - `tracing` targets per subsystem

mod clock;
mod error;
mod hook;
mod id;
pub mod logging;
pub mod signal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{WeftError, WeftResult};
pub use hook::{Decision, Hook};
pub use id::WidgetId;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
