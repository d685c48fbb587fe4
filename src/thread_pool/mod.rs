use crate::error::Result;

mod pool;
mod queue;
pub use pool::WorkerPool;
pub use queue::TaskQueue;

pub trait ThreadPool {
    fn new(size: usize, logger: slog::Logger) -> Self
    where
        Self: Sized;

    /// Spawns a fresh generation of workers.
    fn start(&mut self) -> Result<()>;

    fn submit<F>(&self, job: F) -> Result<()>
    where
        // since function works in a thread, it must have static lifetime
        F: Send + FnOnce() + 'static;

    /// Blocks until every job submitted so far has finished running.
    fn barrier(&self) -> Result<()>;

    /// Stops every worker and waits for their threads to exit.
    fn interrupt(&mut self);

    fn join_and_exit(&mut self) -> Result<()> {
        self.barrier()?;
        self.interrupt();
        Ok(())
    }
}

pub type Job = Box<dyn Send + FnOnce() + 'static>;
