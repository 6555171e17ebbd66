//! Many producers pushing through cloned sinks while readers and requests
//! run on other threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use futures::executor::block_on;

use scroll_cache::{LiveScroller, ScrollerDriver, ScrollerUpdate, UpdateSink};

const PRODUCERS: usize = 4;
const ITEMS_PER_PRODUCER: usize = 250;

/// Answers every query with "nothing changed".
struct Quiet {
    sink: UpdateSink<String>,
}

impl LiveScroller for Quiet {
    fn fetch_more(&mut self) {
        let _ = self.sink.emit(ScrollerUpdate::None);
    }

    fn refresh(&mut self) {
        let _ = self.sink.emit(ScrollerUpdate::None);
    }
}

fn item(producer: usize, seq: usize) -> String {
    format!("{producer}-{seq}")
}

fn parse(item: &str) -> (usize, usize) {
    let (producer, seq) = item.split_once('-').unwrap();
    (producer.parse().unwrap(), seq.parse().unwrap())
}

/// Each producer's items appear in emission order with no gaps, starting at
/// sequence 0 when `from_start` is set.
fn assert_per_producer_order(items: &[String], from_start: bool) {
    let mut next: HashMap<usize, usize> = HashMap::new();
    for entry in items {
        let (producer, seq) = parse(entry);
        match next.get(&producer) {
            Some(expected) => assert_eq!(seq, *expected, "gap or reorder in {items:?}"),
            None if from_start => assert_eq!(seq, 0, "producer {producer} missing its head"),
            None => {}
        }
        next.insert(producer, seq + 1);
    }
}

#[test]
fn test_concurrent_appends_keep_snapshots_prefix_consistent() {
    let driver = ScrollerDriver::spawn(|sink| Quiet { sink }).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let reader = driver.reader();
    let reader_done = Arc::clone(&done);
    let observer = thread::spawn(move || {
        let mut previous = reader.load();
        let mut observed = 0usize;
        loop {
            let finished = reader_done.load(Ordering::Acquire);
            let current = reader.load();
            assert!(current.len() >= previous.len());
            assert_eq!(&current[..previous.len()], &previous[..]);
            assert_per_producer_order(&current, true);
            previous = current;
            observed += 1;
            if finished {
                break;
            }
        }
        observed
    });

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let sink = driver.sink();
            thread::spawn(move || {
                for seq in 0..ITEMS_PER_PRODUCER {
                    sink.emit(ScrollerUpdate::Append(vec![item(producer, seq)])).unwrap();
                }
            })
        })
        .collect();

    // Requests race the producers; whichever update reaches the driver first
    // answers them.
    for round in 0..50 {
        if round % 2 == 0 {
            let window = block_on(driver.request_refresh()).unwrap();
            assert_per_producer_order(&window, true);
        } else {
            let page = block_on(driver.request_append()).unwrap();
            assert_per_producer_order(&page, false);
        }
    }

    for producer in producers {
        producer.join().unwrap();
    }

    let window = block_on(driver.request_refresh()).unwrap();
    assert_eq!(window.len(), PRODUCERS * ITEMS_PER_PRODUCER);
    assert_per_producer_order(&window, true);
    assert_eq!(*driver.snapshot(), window);

    done.store(true, Ordering::Release);
    assert!(observer.join().unwrap() > 0);
}
