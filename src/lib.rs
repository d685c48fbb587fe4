//! Conway's Game of Life stepped generation by generation on a pool of
//! worker threads.
//!
//! Every generation submits one rule evaluation per cell to a
//! [`WorkerPool`](thread_pool::WorkerPool), waits until all of them have run,
//! then commits the new states and repaints in a single job.

pub mod common;
pub mod config;
pub mod error;
pub mod life;
pub mod orchestrator;
pub mod playground;
pub mod surface;
pub mod thread_pool;

pub use common::{Position, Rule, Surface};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use life::Life;
pub use orchestrator::{Orchestrator, Phase};
pub use playground::{Cell, Playground};
pub use surface::TerminalSurface;
pub use thread_pool::{TaskQueue, ThreadPool, WorkerPool};
