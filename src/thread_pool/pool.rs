use super::{queue::TaskQueue, Job, ThreadPool};
use crate::error::{Error, Result};
use crossbeam::channel::{bounded, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use slog::{debug, error, info, o, Logger};
use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// A fixed number of workers sharing one `TaskQueue`.
///
/// Workers are spawned by `start` and torn down by `interrupt`; jobs can be
/// submitted at any time and wait in the queue while no workers run.
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    workers: Vec<Worker>,
    // dropping it tells the current generation of workers to exit
    stop: Option<Sender<()>>,
    // every queued job holds a clone until it has run
    pending: Mutex<WaitGroup>,
    active: Arc<AtomicUsize>,
    size: usize,
    epoch: u64,
    logger: Logger,
}

impl ThreadPool for WorkerPool {
    fn new(size: usize, logger: Logger) -> Self {
        WorkerPool {
            queue: Arc::new(TaskQueue::new()),
            workers: Vec::with_capacity(size),
            stop: None,
            pending: Mutex::new(WaitGroup::new()),
            active: Arc::new(AtomicUsize::new(0)),
            size,
            epoch: 0,
            logger,
        }
    }

    fn start(&mut self) -> Result<()> {
        if self.stop.is_some() {
            return Err(Error::usage(format!(
                "start called while {} workers of epoch {} are still running",
                self.workers.len(),
                self.epoch
            )));
        }
        if self.size == 0 {
            return Err(Error::usage("pool has no room for workers".to_string()));
        }

        let (stop_sender, stop_receiver) = bounded::<()>(0);
        self.stop = Some(stop_sender);
        self.epoch += 1;
        let logger = self.logger.new(o!("epoch" => self.epoch));

        for id in 0..self.size {
            let receiver = JobReceiver::new(
                self.queue.clone(),
                stop_receiver.clone(),
                self.active.clone(),
                logger.new(o!("worker" => id)),
            );
            match Worker::new(id, receiver) {
                Ok(worker) => self.workers.push(worker),
                Err(err) => {
                    // do not leave a half started generation behind
                    self.interrupt();
                    return Err(err);
                }
            }
        }

        info!(logger, "workers started"; "size" => self.size, "queued" => self.queue.len());
        Ok(())
    }

    fn submit<F>(&self, job: F) -> Result<()>
    where
        F: Send + FnOnce() + 'static,
    {
        let ticket = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        // the ticket is released on unwind too
        self.queue.push(Box::new(move || {
            job();
            drop(ticket);
        }));
        Ok(())
    }

    /// Waits for jobs submitted before this call. Jobs submitted while
    /// waiting belong to the next barrier.
    fn barrier(&self) -> Result<()> {
        if self.stop.is_none() && !self.queue.is_empty() {
            return Err(Error::usage(format!(
                "barrier on a stopped pool would wait forever for {} queued jobs",
                self.queue.len()
            )));
        }

        let pending = mem::replace(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
            WaitGroup::new(),
        );
        pending.wait();
        Ok(())
    }

    fn interrupt(&mut self) {
        if self.stop.take().is_none() {
            return;
        }

        for worker in self.workers.drain(..) {
            worker.join(&self.logger);
        }
        info!(self.logger, "workers stopped";
            "epoch" => self.epoch,
            "queued" => self.queue.len()
        );
    }
}

impl WorkerPool {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    /// Number of worker threads currently alive.
    pub fn active_workers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

// destroy threads when pool is dead
impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.interrupt();
    }
}

pub struct JobReceiver {
    queue: Arc<TaskQueue>,
    stop: Receiver<()>,
    // shared count of live workers
    active: Arc<AtomicUsize>,
    logger: Logger,
}

impl JobReceiver {
    pub fn new(
        queue: Arc<TaskQueue>,
        stop: Receiver<()>,
        active: Arc<AtomicUsize>,
        logger: Logger,
    ) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        JobReceiver {
            queue,
            stop,
            active,
            logger,
        }
    }

    fn next(&self) -> Option<Job> {
        self.queue.pop_or_stop(&self.stop)
    }
}

impl Drop for JobReceiver {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(id: usize, receiver: JobReceiver) -> Result<Worker> {
        let thread = thread::Builder::new()
            .name(format!("gol-worker-{}", id))
            .spawn(move || {
                do_job(receiver);
            })?;

        Ok(Worker {
            id,
            thread: Some(thread),
        })
    }

    fn join(mut self, logger: &Logger) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(logger, "worker died outside of a job"; "worker" => self.id);
            }
        }
    }
}

// complete job
fn do_job(receiver: JobReceiver) {
    debug!(receiver.logger, "worker waiting for jobs");
    while let Some(job) = receiver.next() {
        // a failing job costs that job only, the worker keeps polling
        if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(receiver.logger, "job panicked"; "cause" => panic_message(&*cause));
        }
    }
    debug!(receiver.logger, "worker interrupted");
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(msg) = cause.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = cause.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown cause".to_string()
    }
}
