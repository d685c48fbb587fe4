use gol::{ErrorKind, TaskQueue, ThreadPool, WorkerPool};
use slog::{o, Discard, Logger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

fn logger() -> Logger {
    Logger::root(Discard, o!())
}

fn started(size: usize) -> WorkerPool {
    let mut pool = WorkerPool::new(size, logger());
    pool.start().unwrap();
    pool
}

#[test]
fn every_task_runs_exactly_once() {
    for &k in &[0usize, 1, 50, 10000] {
        let pool = started(8);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..k {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.barrier().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), k, "k = {}", k);
    }
}

#[test]
fn barrier_waits_for_running_tasks() {
    let pool = started(50);
    let completed = Arc::new(AtomicUsize::new(0));
    let workload = 40000;

    for i in 0..workload {
        let completed = completed.clone();
        pool.submit(move || {
            // the last tasks are slow so the queue empties long before they finish
            if i >= workload - 50 {
                thread::sleep(Duration::from_millis(20));
            }
            completed.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.barrier().unwrap();
    assert_eq!(completed.load(Ordering::SeqCst), workload);
}

#[test]
fn interrupt_stops_all_workers_and_start_spawns_fresh_ones() {
    let mut pool = started(50);
    assert!(pool.is_running());
    assert_eq!(pool.active_workers(), 50);

    pool.interrupt();
    assert!(!pool.is_running());
    assert_eq!(pool.active_workers(), 0);

    pool.start().unwrap();
    assert_eq!(pool.active_workers(), 50);

    pool.join_and_exit().unwrap();
    assert_eq!(pool.active_workers(), 0);
}

#[test]
fn start_on_running_pool_is_a_usage_error() {
    let mut pool = started(4);
    let err = pool.start().unwrap_err();
    match err.kind() {
        ErrorKind::Usage(_) => {}
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(pool.active_workers(), 4);
}

#[test]
fn queued_tasks_survive_restart() {
    let mut pool = WorkerPool::new(3, logger());
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..10 {
        let counter = counter.clone();
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }
    assert_eq!(pool.queued(), 10);

    // nobody would ever drain the queue
    match pool.barrier().unwrap_err().kind() {
        ErrorKind::Usage(_) => {}
        other => panic!("unexpected error {:?}", other),
    }

    pool.start().unwrap();
    pool.join_and_exit().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert_eq!(pool.queued(), 0);
}

#[test]
fn panicking_task_does_not_kill_worker() {
    let pool = started(1);
    let counter = Arc::new(AtomicUsize::new(0));

    pool.submit(|| panic!("corrupted cell")).unwrap();
    for _ in 0..5 {
        let counter = counter.clone();
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.barrier().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 5);
    assert_eq!(pool.active_workers(), 1);
}

#[test]
fn dropping_pool_joins_workers() {
    let pool = started(6);
    let ran = Arc::new(AtomicUsize::new(0));
    {
        let ran = ran.clone();
        pool.submit(move || {
            ran.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }
    pool.barrier().unwrap();
    drop(pool);
    // the job closure is the only other owner and it is gone with the workers
    assert_eq!(Arc::strong_count(&ran), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn single_consumer_sees_fifo_order() {
    let pool = started(1);
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 1..=3 {
        let order = order.clone();
        pool.submit(move || order.lock().unwrap().push(i)).unwrap();
    }
    pool.barrier().unwrap();
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn concurrent_producers_and_consumers_lose_nothing() {
    let queue = Arc::new(TaskQueue::new());
    let executed = Arc::new(AtomicUsize::new(0));
    let producers = 50;
    let per_producer = 200;
    let start = Arc::new(Barrier::new(producers * 2));

    let mut handles = Vec::new();
    for _ in 0..producers {
        let queue = queue.clone();
        let executed = executed.clone();
        let start = start.clone();
        handles.push(thread::spawn(move || {
            start.wait();
            for _ in 0..per_producer {
                let executed = executed.clone();
                queue.push(Box::new(move || {
                    executed.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }));
    }
    for _ in 0..producers {
        let queue = queue.clone();
        let start = start.clone();
        handles.push(thread::spawn(move || {
            start.wait();
            for _ in 0..per_producer {
                let job = queue.pop().unwrap();
                job();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(queue.is_empty());
    assert_eq!(executed.load(Ordering::SeqCst), producers * per_producer);
}
