//! Tests for `Listener` on its own.

use std::sync::Arc;

use less_emitter::{Callback, Listener};
use serde_json::json;

use super::support::{entries, make_log, recorder};

// ============================================================================
// add / dispatch
// ============================================================================

#[test]
fn dispatch_calls_slots_in_insertion_order() {
    let listener = Arc::new(Listener::new());
    let log = make_log();

    listener.add(recorder(&log, "a"));
    listener.add(recorder(&log, "b"));
    listener.add(recorder(&log, "c"));

    listener.dispatch(&[json!(1), json!("x")]);

    assert_eq!(entries(&log), vec!["a:1,x", "b:1,x", "c:1,x"]);
}

#[test]
fn same_callback_added_twice_fires_twice() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let cb = recorder(&log, "dup");

    listener.add(cb.clone());
    listener.add(cb.clone());
    assert_eq!(listener.size(), 2);

    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["dup:", "dup:"]);

    // Removing by identity drops both slots.
    listener.remove(Some(&cb));
    assert_eq!(listener.size(), 0);
}

#[test]
fn dispatch_with_no_slots_is_a_no_op() {
    let listener = Listener::new();
    listener.dispatch(&[json!(42)]);
    assert!(!listener.has(None));
}

// ============================================================================
// Subscription handle
// ============================================================================

#[test]
fn unsubscribe_removes_and_returns_the_callback() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let cb = recorder(&log, "a");

    let sub = listener.add(cb.clone());
    let returned = sub.unsubscribe();

    assert_eq!(returned, cb);
    assert!(!listener.has(Some(&cb)));
    listener.dispatch(&[]);
    assert!(entries(&log).is_empty());
}

#[test]
fn unsubscribe_twice_is_safe() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let keep = recorder(&log, "keep");

    let sub = listener.add(recorder(&log, "gone"));
    listener.add(keep.clone());

    sub.unsubscribe();
    sub.unsubscribe();

    assert!(listener.has(Some(&keep)));
    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["keep:"]);
}

// ============================================================================
// has
// ============================================================================

#[test]
fn has_tracks_registration() {
    let listener = Arc::new(Listener::new());
    let cb = Callback::new(|_| {});
    let other = Callback::new(|_| {});

    assert!(!listener.has(None));
    assert!(!listener.has(Some(&cb)));

    listener.add(cb.clone());
    assert!(listener.has(None));
    assert!(listener.has(Some(&cb)));
    assert!(!listener.has(Some(&other)), "identity, not structure, decides");

    listener.remove(Some(&cb));
    assert!(!listener.has(None));
}

#[test]
fn once_slot_matches_its_original_callback() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let cb = recorder(&log, "once");

    listener.add_once(cb.clone());
    assert!(listener.has(Some(&cb)));

    listener.remove(Some(&cb));
    assert!(!listener.has(Some(&cb)));

    listener.dispatch(&[]);
    assert!(entries(&log).is_empty());
}

#[test]
fn once_handle_removes_only_its_own_slot() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let cb = recorder(&log, "cb");

    listener.add(cb.clone());
    let once = listener.add_once(cb.clone());
    assert_eq!(listener.size(), 2);

    assert_eq!(once.unsubscribe(), cb);
    assert_eq!(listener.size(), 1);

    listener.dispatch(&[]);
    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["cb:", "cb:"]);
}

// ============================================================================
// Mutation during dispatch
// ============================================================================

#[test]
fn removing_a_callback_during_dispatch_keeps_the_current_round() {
    let listener = Arc::new(Listener::new());
    let log = make_log();
    let second = recorder(&log, "second");

    {
        let listener_clone = Arc::clone(&listener);
        let second = second.clone();
        let log = Arc::clone(&log);
        listener.add(Callback::new(move |_| {
            log.lock().unwrap().push("first:".to_string());
            listener_clone.remove(Some(&second));
        }));
    }
    listener.add(second.clone());

    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["first:", "second:"]);

    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["first:", "second:", "first:"]);
}

#[test]
fn clearing_during_dispatch_skips_remaining_slots() {
    let listener = Arc::new(Listener::new());
    let log = make_log();

    {
        let listener_clone = Arc::clone(&listener);
        let log = Arc::clone(&log);
        listener.add(Callback::new(move |_| {
            log.lock().unwrap().push("first:".to_string());
            listener_clone.remove(None);
        }));
    }
    listener.add(recorder(&log, "second"));

    listener.dispatch(&[]);

    assert_eq!(entries(&log), vec!["first:"]);
    assert!(!listener.has(None));
}

#[test]
fn slot_added_during_dispatch_waits_for_the_next_round() {
    let listener = Arc::new(Listener::new());
    let log = make_log();

    {
        let listener_clone = Arc::clone(&listener);
        let log_clone = Arc::clone(&log);
        listener.add_once(Callback::new(move |_| {
            log_clone.lock().unwrap().push("first:".to_string());
            listener_clone.add(recorder(&log_clone, "late"));
        }));
    }

    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["first:"]);

    listener.dispatch(&[]);
    assert_eq!(entries(&log), vec!["first:", "late:"]);
}

// ============================================================================
// Panics propagate
// ============================================================================

#[test]
fn panicking_callback_stops_the_dispatch() {
    let listener = Arc::new(Listener::new());
    let log = make_log();

    listener.add(Callback::new(|_| panic!("first panics")));
    listener.add(recorder(&log, "second"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        listener.dispatch(&[]);
    }));

    assert!(result.is_err(), "dispatch should propagate panics from callbacks");
    assert!(entries(&log).is_empty());
}

// ============================================================================
// Concurrent use
// ============================================================================

#[test]
fn concurrent_adds_survive_concurrent_removals() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 500;

    let listener = Arc::new(Listener::new());
    let stranger = Callback::new(|_| {});

    let remover = {
        let listener = Arc::clone(&listener);
        let stranger = stranger.clone();
        std::thread::spawn(move || {
            for _ in 0..2000 {
                listener.remove(Some(&stranger));
            }
        })
    };

    let adders: Vec<_> = (0..THREADS)
        .map(|_| {
            let listener = Arc::clone(&listener);
            std::thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    listener.add(Callback::new(|_| {}));
                }
            })
        })
        .collect();

    for adder in adders {
        adder.join().unwrap();
    }
    remover.join().unwrap();

    assert_eq!(listener.size(), THREADS * PER_THREAD);
}
