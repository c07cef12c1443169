//! Cancelable "before-change" hooks.
//!
//! A [`Hook<Args>`] is the veto counterpart of [`Signal`](crate::Signal):
//! every connected handler returns a [`Decision`], and the hook reports
//! [`Decision::Cancel`] if any handler cancels. The owner invokes the hook
//! synchronously before committing a state change and aborts the change when
//! it is canceled.
//!
//! ```
//! use weft_core::{Decision, Hook};
//!
//! let closing = Hook::<u32>::new();
//! closing.connect(|code| if *code == 0 { Decision::Cancel } else { Decision::Proceed });
//!
//! assert_eq!(closing.invoke(&0), Decision::Cancel);
//! assert_eq!(closing.invoke(&1), Decision::Proceed);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::signal::ConnectionId;

/// Outcome of a veto handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    /// Let the change happen.
    #[default]
    Proceed,
    /// Abort the change.
    Cancel,
}

impl Decision {
    /// Whether this decision cancels the change.
    #[inline]
    pub fn is_cancel(self) -> bool {
        self == Self::Cancel
    }
}

type Handler<Args> = Arc<dyn Fn(&Args) -> Decision + Send + Sync>;

/// A set of veto handlers consulted before a state change.
pub struct Hook<Args> {
    handlers: Mutex<SlotMap<ConnectionId, Handler<Args>>>,
}

impl<Args: 'static> Default for Hook<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Hook<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("handlers", &self.handlers.lock().len())
            .finish()
    }
}

impl<Args: 'static> Hook<Args> {
    /// Create a hook with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a veto handler.
    pub fn connect<F>(&self, handler: F) -> ConnectionId
    where
        F: Fn(&Args) -> Decision + Send + Sync + 'static,
    {
        self.handlers.lock().insert(Arc::new(handler))
    }

    /// Remove a handler. Returns `true` if it was connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.handlers.lock().remove(id).is_some()
    }

    /// Number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Run every handler and combine their decisions.
    ///
    /// All handlers run even after one cancels, so each observes the pending
    /// change.
    pub fn invoke(&self, args: &Args) -> Decision {
        let handlers: Vec<Handler<Args>> = self.handlers.lock().values().cloned().collect();

        let mut decision = Decision::Proceed;
        for handler in handlers {
            if handler(args).is_cancel() {
                decision = Decision::Cancel;
            }
        }
        decision
    }
}

static_assertions::assert_impl_all!(Hook<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_hook_proceeds() {
        let hook = Hook::<()>::new();
        assert_eq!(hook.invoke(&()), Decision::Proceed);
    }

    #[test]
    fn test_any_cancel_wins() {
        let hook = Hook::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        hook.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Decision::Cancel
        });
        let c = calls.clone();
        hook.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Decision::Proceed
        });

        assert_eq!(hook.invoke(&()), Decision::Cancel);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnect_handler() {
        let hook = Hook::<()>::new();
        let id = hook.connect(|_| Decision::Cancel);
        assert!(hook.disconnect(id));
        assert_eq!(hook.handler_count(), 0);
        assert_eq!(hook.invoke(&()), Decision::Proceed);
    }
}
