/*!
 * Drainable Buffer Integration Tests
 * Concurrent producers and consumers with exactly-once delivery
 */

use keyed_sync::{ConcurrentDrainableBuffer, SyncError};
use pretty_assertions::assert_eq;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 30;
const READERS: usize = 5;
const WRITES_PER_WRITER: usize = 5000;

#[test]
fn test_every_element_delivered_exactly_once() {
    let buffer = Arc::new(ConcurrentDrainableBuffer::new());
    let writers_done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            let writers_done = Arc::clone(&writers_done);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut seen: Vec<usize> = Vec::new();
                loop {
                    // Check before draining so a final pass runs after the writers stop
                    let finished = writers_done.load(Ordering::SeqCst);
                    if rng.gen_bool(0.5) {
                        seen.extend(buffer.drain_all());
                    } else {
                        let batch = rng.gen_range(0..200isize);
                        seen.extend(buffer.drain_up_to(batch).unwrap());
                    }
                    if finished {
                        seen.extend(buffer.drain_all());
                        return seen;
                    }
                    thread::yield_now();
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..WRITERS)
        .map(|id| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for _ in 0..WRITES_PER_WRITER {
                    buffer.add(id);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    writers_done.store(true, Ordering::SeqCst);

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for reader in readers {
        for value in reader.join().unwrap() {
            *counts.entry(value).or_default() += 1;
        }
    }

    assert!(buffer.is_empty());
    assert_eq!(counts.len(), WRITERS);
    for id in 0..WRITERS {
        assert_eq!(counts[&id], WRITES_PER_WRITER, "writer {} miscounted", id);
    }
}

#[test]
fn test_single_producer_order_preserved_across_drains() {
    let buffer = Arc::new(ConcurrentDrainableBuffer::new());

    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || buffer.add_all(0..10_000u32))
    };

    let mut received = Vec::new();
    while received.len() < 10_000 {
        received.extend(buffer.drain(64));
    }
    producer.join().unwrap();

    let expected: Vec<u32> = (0..10_000).collect();
    assert_eq!(received, expected);
}

#[test]
fn test_negative_batch_size_is_rejected() {
    let buffer = ConcurrentDrainableBuffer::new();
    buffer.add_all(["x", "y"]);

    let err = buffer.drain_up_to(-1).unwrap_err();
    assert!(matches!(err, SyncError::NegativeBatchSize(-1)));
    assert_eq!(buffer.len(), 2);

    assert_eq!(buffer.drain_up_to(0).unwrap(), Vec::<&str>::new());
    assert_eq!(buffer.drain_up_to(isize::MAX).unwrap(), vec!["x", "y"]);
}

#[test]
fn test_empty_buffer_drains_nothing() {
    let buffer: ConcurrentDrainableBuffer<String> = ConcurrentDrainableBuffer::default();
    assert!(buffer.drain_all().is_empty());
    assert!(buffer.drain(5).is_empty());
    assert!(buffer.is_empty());
}
