//! Integration tests for the dispatch queue under real thread contention.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use quickmenu_core::{Callback, DispatchQueue, ThreadAffinity};

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_per_producer_order_is_preserved() {
    setup();
    let queue = Arc::new(DispatchQueue::new(ThreadAffinity::current()));
    let seen = Arc::new(Mutex::new(Vec::new()));

    std::thread::scope(|s| {
        for producer in 0..4 {
            let queue = queue.clone();
            let seen = seen.clone();
            s.spawn(move || {
                for step in 0..50 {
                    let seen = seen.clone();
                    queue.enqueue(move || seen.lock().push((producer, step)));
                }
            });
        }
    });

    let report = queue.drain();
    assert_eq!(report.executed, 200);

    let seen = seen.lock();
    for producer in 0..4 {
        let steps: Vec<_> = seen
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, step)| *step)
            .collect();
        assert_eq!(steps, (0..50).collect::<Vec<_>>());
    }
}

#[test]
fn test_faulty_callbacks_do_not_stall_drain() {
    setup();
    let queue = Arc::new(DispatchQueue::new(ThreadAffinity::current()));
    let faulty = Arc::new(Callback::<usize>::new());
    faulty.set(|n| {
        if n % 2 == 0 {
            panic!("callback {n} failed");
        }
    });

    let completed = Arc::new(AtomicUsize::new(0));
    for n in 0..10 {
        let faulty = faulty.clone();
        let completed = completed.clone();
        queue.enqueue(move || {
            faulty.invoke(&n);
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }

    let report = queue.drain();
    assert_eq!(report.executed, 5);
    assert_eq!(report.failed, 5);
    assert_eq!(completed.load(Ordering::SeqCst), 5);
    assert!(queue.is_empty());
}

#[test]
fn test_enqueue_while_draining_from_other_thread() {
    setup();
    let queue = Arc::new(DispatchQueue::new(ThreadAffinity::current()));
    let hits = Arc::new(AtomicUsize::new(0));

    let remote = queue.clone();
    let h = hits.clone();
    queue.enqueue(move || {
        let inner = remote.clone();
        let h = h.clone();
        std::thread::spawn(move || {
            inner.enqueue(move || {
                h.fetch_add(1, Ordering::SeqCst);
            });
        })
        .join()
        .unwrap();
    });

    assert_eq!(queue.drain().executed, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
