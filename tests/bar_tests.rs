//! Tests for the bar: counters, the flush protocol and the sink contract.

use linebar::bar::{Bar, BarBuilder, BarConfig};
use linebar::format;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod common;
use common::helpers::*;

#[test]
fn test_hundred_steps_close_once() {
    let finals = Arc::new(AtomicUsize::new(0));
    let counter = finals.clone();
    let (builder, buffer) = captured_builder(100);
    let bar = builder
        .format(vec![format::rate_size()])
        .on_final(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let mut closed = Vec::new();
    for _ in 0..100 {
        bar.add(1);
        closed.push(bar.flush());
    }

    assert!(closed[..99].iter().all(|closed| !closed));
    assert!(closed[99]);
    assert_eq!(bar.current(), 100);
    assert_eq!(buffer.frames(), 100);
    assert!(buffer.contents().ends_with("\r\x1b[K100/100\n"));
    assert_eq!(buffer.contents().matches('\n').count(), 1);

    // Further flushes and closes are no-ops.
    assert!(bar.flush());
    bar.close();
    assert_eq!(finals.load(Ordering::SeqCst), 1);
    assert_eq!(buffer.frames(), 100);
}

#[test]
fn test_zero_total_rate() {
    let bar = Bar::new(BarConfig::hidden());
    assert_eq!(bar.total(), 0);
    assert_eq!(bar.rate(), 0.0);
    bar.add(5);
    assert_eq!(bar.current(), 0);
    assert_eq!(bar.rate(), 0.0);
}

#[test]
fn test_frame_wire_format() {
    let (builder, buffer) = captured_builder(10);
    let bar = builder
        .prefix("> ")
        .suffix(" <")
        .split(" | ")
        .format(vec![format::text("fetch"), format::rate_size()])
        .build();

    bar.add(3);
    assert!(!bar.flush());
    assert_eq!(buffer.contents(), "\r\x1b[K> fetch | 3/10 <");
    assert_eq!(bar.render(), "> fetch | 3/10 <");
    assert_eq!(bar.to_string(), "> fetch | 3/10 <");
}

#[test]
fn test_log_lands_above_line() {
    let (bar, buffer) = counting_bar(10);
    bar.log("hello");
    bar.log(format_args!("segment {} failed\n", 3));
    assert_eq!(
        buffer.contents(),
        "\r\x1b[Khello\n\r\x1b[Ksegment 3 failed\n"
    );
    assert_eq!(bar.current(), 0);
}

#[test]
fn test_flush_after_close_writes_nothing() {
    let (bar, buffer) = counting_bar(10);
    bar.add(4);
    bar.close();
    assert!(bar.is_closed());
    assert_eq!(buffer.contents(), "\n");

    buffer.clear();
    assert!(bar.flush());
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_concurrent_adds() {
    let (bar, _buffer) = counting_bar(1000);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bar = bar.clone();
            thread::spawn(move || {
                for _ in 0..125 {
                    bar.add(1);
                    bar.flush();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(bar.current(), 1000);
    assert!(bar.is_closed());
}

#[test]
fn test_current_never_exceeds_total() {
    let (bar, _buffer) = counting_bar(10);
    for n in [3, 4, 5, 100] {
        bar.add(n);
        assert!(bar.current() <= bar.total());
    }
    bar.set_current(50);
    assert_eq!(bar.current(), 10);
    bar.set_current(-4);
    assert_eq!(bar.current(), -4);
    assert_eq!(bar.last(), -14);
}

#[test]
fn test_auto_flush() {
    let (builder, buffer) = captured_builder(3);
    let bar = builder
        .format(vec![format::rate_size()])
        .auto_flush(true)
        .build();

    bar.add(1);
    bar.add(1);
    assert_eq!(buffer.frames(), 2);
    bar.add(1);
    assert!(bar.is_closed());
    assert!(buffer.contents().ends_with("3/3\n"));
}

#[test]
fn test_listeners_run_in_order() {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let first = seen.clone();
    let second = seen.clone();
    let bar = BarBuilder::hidden()
        .total(10)
        .on_mutate(move |_, s| first.lock().push(("first", s.current())))
        .on_mutate(move |_, s| second.lock().push(("second", s.current())))
        .build();

    bar.add(2);
    bar.set_current(7);
    assert_eq!(
        *seen.lock(),
        [("first", 2), ("second", 2), ("first", 7), ("second", 7)]
    );
}

#[test]
fn test_flush_interval_closes_bar() {
    let (builder, buffer) = captured_builder(1);
    let bar = builder
        .format(vec![format::rate_size()])
        .flush_interval(Duration::from_millis(10))
        .build();

    bar.add(1);
    for _ in 0..100 {
        if bar.is_closed() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(bar.is_closed());
    assert!(buffer.contents().ends_with("1/1\n"));
}

#[test]
fn test_copy_counts_bytes() {
    let content = create_test_content(10_000);
    let (bar, _buffer) = counting_bar(content.len() as i64);
    let mut out = Vec::new();

    let copied = bar.copy_buf(&mut out, content.as_slice(), 512).unwrap();
    assert_eq!(copied, 10_000);
    assert_eq!(out, content);
    assert_eq!(bar.current(), 10_000);
    assert!(bar.is_closed());
}

#[test]
fn test_set_current_to_minimum() {
    let (bar, buffer) = counting_bar(10);
    bar.set_current(5);
    bar.set_current(i64::MIN);
    assert_eq!(bar.current(), i64::MIN);
    assert_eq!(bar.last(), i64::MIN);
    assert!(!bar.flush());
    assert_eq!(buffer.contents(), format!("{CLEAR}{}/10", i64::MIN));
}

#[test]
fn test_add_saturates_at_maximum() {
    let (bar, _buffer) = counting_bar(i64::MAX);
    bar.add(i64::MAX - 1);
    bar.add(i64::MAX);
    assert_eq!(bar.current(), i64::MAX);
    assert!(bar.flush());
}

#[test]
fn test_shrunk_total_closes_without_clamp() {
    let (bar, buffer) = counting_bar(10);
    bar.add(8);
    bar.set_total(5);
    assert!(bar.flush());
    assert_eq!(bar.current(), 8);
    assert_eq!(buffer.contents(), format!("{CLEAR}8/5\n"));
}

#[test]
fn test_default_segments_with_huge_total() {
    let bar = BarBuilder::hidden().total(i64::MAX).build();
    assert!(!bar.flush());
    for _ in 0..3 {
        bar.add(1);
        thread::sleep(Duration::from_millis(5));
        assert!(!bar.flush());
    }
    assert_eq!(bar.current(), 3);
    assert!(bar.render().contains("3/9223372036854775807"));
}
