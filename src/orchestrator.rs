use crate::common::{Rule, Surface};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::playground::Playground;
use crate::thread_pool::{ThreadPool, WorkerPool};
use slog::{debug, info, o, Logger};
use std::fmt;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Evaluate,
    Drain,
    Commit,
    Pace,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Evaluate => "evaluate",
            Phase::Drain => "drain",
            Phase::Commit => "commit",
            Phase::Pace => "pace",
        };
        f.write_str(name)
    }
}

/// Steps a playground through generations on a worker pool.
///
/// Each generation fans out one rule evaluation per cell, waits for all of
/// them, then runs a single job that moves every cell to its next state and
/// repaints the surface. The pool is started once and kept for the whole run.
pub struct Orchestrator<R: Rule, S: Surface> {
    config: Config,
    playground: Arc<Playground>,
    rule: Arc<R>,
    surface: Arc<S>,
    pool: WorkerPool,
    generation: u64,
    logger: Logger,
}

impl<R: Rule, S: Surface> Orchestrator<R, S> {
    pub fn new(
        config: Config,
        playground: Playground,
        rule: R,
        surface: S,
        logger: Logger,
    ) -> Result<Self> {
        config.validate()?;
        if playground.width() != config.width || playground.height() != config.height {
            return Err(Error::invalid_config(format!(
                "playground is {}x{} but config asks for {}x{}",
                playground.width(),
                playground.height(),
                config.width,
                config.height
            )));
        }

        let mut pool = WorkerPool::new(config.pool_size, logger.new(o!("component" => "pool")));
        pool.start()?;

        Ok(Orchestrator {
            config,
            playground: Arc::new(playground),
            rule: Arc::new(rule),
            surface: Arc::new(surface),
            pool,
            generation: 0,
            logger,
        })
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Number of generations completed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn finished(&self) -> bool {
        match self.config.generations {
            Some(limit) => self.generation >= limit,
            None => false,
        }
    }

    /// Runs one full generation without pacing.
    pub fn step(&mut self) -> Result<()> {
        if !self.pool.is_running() {
            return Err(Error::usage("step on a stopped orchestrator".to_string()));
        }
        let logger = self.logger.new(o!("generation" => self.generation + 1));

        debug!(logger, "entering phase"; "phase" => %Phase::Evaluate);
        for (position, index) in self.playground.positions().zip(0..) {
            let playground = self.playground.clone();
            let rule = self.rule.clone();
            self.pool.submit(move || {
                let cell = &playground.cells()[index];
                rule.evaluate(&playground, cell, position);
            })?;
        }

        debug!(logger, "entering phase"; "phase" => %Phase::Drain);
        self.pool.barrier()?;

        debug!(logger, "entering phase"; "phase" => %Phase::Commit);
        let playground = self.playground.clone();
        let surface = self.surface.clone();
        let generation = self.generation + 1;
        self.pool.submit(move || {
            playground.cells().iter().for_each(|cell| cell.next_gen());
            surface.repaint(&playground, generation);
        })?;
        // the next evaluate phase must not see a half committed grid
        self.pool.barrier()?;

        self.generation = generation;
        debug!(logger, "generation done"; "alive" => self.playground.alive_count());
        Ok(())
    }

    /// Steps forever, or until `config.generations` are done, sleeping
    /// `config.tick_millis` between generations. A bounded run ends by
    /// flushing the surface so the last generation is what stays on screen.
    pub fn run(&mut self) -> Result<()> {
        info!(self.logger, "simulation started";
            "width" => self.config.width,
            "height" => self.config.height,
            "workers" => self.config.pool_size,
            "tick_ms" => self.config.tick_millis
        );

        while !self.finished() {
            self.step()?;
            if !self.finished() {
                debug!(self.logger, "entering phase"; "phase" => %Phase::Pace, "generation" => self.generation);
                thread::sleep(self.config.tick());
            }
        }

        self.pool.join_and_exit()?;
        self.surface.flush(&self.playground, self.generation);
        info!(self.logger, "simulation finished";
            "generations" => self.generation,
            "alive" => self.playground.alive_count()
        );
        Ok(())
    }
}
