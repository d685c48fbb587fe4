use super::Job;
use crossbeam::channel::{select, unbounded, Receiver, Sender};

/// FIFO of jobs shared by the submitting thread and every worker.
///
/// Backed by an unbounded crossbeam channel, so `push` never blocks and an
/// empty `pop` parks the caller instead of polling.
pub struct TaskQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded::<Job>();
        TaskQueue { sender, receiver }
    }

    /// Appends a job to the tail of the queue.
    pub fn push(&self, job: Job) {
        // cannot fail, the queue owns the receiving end
        let _ = self.sender.send(job);
    }

    /// Removes the head of the queue, parking until one is available.
    /// Never `None` in practice, the queue owns the sending end too.
    pub fn pop(&self) -> Option<Job> {
        self.receiver.recv().ok()
    }

    /// Like `pop`, but gives up as soon as `stop` is signalled or disconnected.
    /// Returns `None` in that case.
    pub fn pop_or_stop(&self, stop: &Receiver<()>) -> Option<Job> {
        select! {
            recv(stop) -> _ => None,
            recv(self.receiver) -> job => job.ok(),
        }
    }

    // point in time read, may be stale by the time the caller looks at it
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        TaskQueue::new()
    }
}
