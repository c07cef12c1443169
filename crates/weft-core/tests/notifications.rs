//! Integration tests for signals, veto hooks and clocks working together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use weft_core::{Clock, Decision, Hook, ManualClock, Signal};

/// A tiny focus holder that mirrors how the desktop consults a veto hook
/// before committing a change and notifies afterwards.
struct Holder {
    current: Option<u32>,
    losing: Hook<u32>,
    changed: Signal<Option<u32>>,
}

impl Holder {
    fn new() -> Self {
        Self {
            current: None,
            losing: Hook::new(),
            changed: Signal::new(),
        }
    }

    fn set(&mut self, value: Option<u32>) -> bool {
        if let Some(old) = self.current {
            if self.losing.invoke(&old).is_cancel() {
                return false;
            }
        }
        self.current = value;
        self.changed.emit(value);
        true
    }
}

#[test]
fn veto_aborts_change_and_suppresses_notification() {
    let mut holder = Holder::new();
    let notifications = Arc::new(AtomicUsize::new(0));

    let n = notifications.clone();
    holder.changed.connect(move |_| {
        n.fetch_add(1, Ordering::SeqCst);
    });
    holder
        .losing
        .connect(|old| if *old == 1 { Decision::Cancel } else { Decision::Proceed });

    assert!(holder.set(Some(1)));
    assert!(!holder.set(Some(2)));
    assert_eq!(holder.current, Some(1));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn signal_arguments_are_observed_in_order() {
    let signal = Signal::<(u32, &'static str)>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    signal.connect(move |(n, label)| s.lock().push(format!("{label}{n}")));

    signal.emit((1, "a"));
    signal.emit((2, "b"));

    assert_eq!(*seen.lock(), vec!["a1".to_string(), "b2".to_string()]);
}

#[test]
fn disconnect_all_silences_every_slot() {
    let signal = Signal::<()>::new();
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let calls = calls.clone();
        signal.connect(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    signal.emit(());
    signal.disconnect_all();
    signal.emit(());

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(signal.connection_count(), 0);
}

#[test]
fn manual_clock_is_shared_between_clones() {
    let clock = ManualClock::new();
    let boxed: Box<dyn Clock> = Box::new(clock.clone());

    clock.advance_ms(499);
    assert_eq!(boxed.now().as_millis(), 499);
}
