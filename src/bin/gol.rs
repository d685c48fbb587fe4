use clap::{crate_authors, crate_version, Clap};
use gol::{Config, Life, Orchestrator, Playground, Result, TerminalSurface};
use rand::{rngs::StdRng, SeedableRng};
use slog::*;
use std::{path::PathBuf, process::exit};

#[derive(Clap)]
#[clap(version = crate_version!(), author = crate_authors!())]
struct Options {
    /// JSON file with the simulation settings
    #[clap(long, short, parse(from_os_str))]
    config: Option<PathBuf>,

    #[clap(long)]
    width: Option<usize>,

    #[clap(long)]
    height: Option<usize>,

    /// probability that a cell starts alive
    #[clap(long)]
    probability: Option<f32>,

    /// number of worker threads
    #[clap(long)]
    threads: Option<usize>,

    /// milliseconds to sleep between generations
    #[clap(long)]
    tick: Option<u64>,

    /// stop after this many generations
    #[clap(long)]
    generations: Option<u64>,

    #[clap(long)]
    seed: Option<u64>,
}

impl Options {
    fn settings(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(p) = self.probability {
            config.alive_probability = p;
        }
        if let Some(threads) = self.threads {
            config.pool_size = threads;
        }
        if let Some(tick) = self.tick {
            config.tick_millis = tick;
        }
        if self.generations.is_some() {
            config.generations = self.generations;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let logger = logger();
    let options = Options::parse();

    if let Err(e) = options.settings().and_then(|config| run(config, &logger)) {
        error!(&logger, "{}", e);
        // async drain must flush before exit
        drop(logger);
        exit(1);
    }
}

// stdout belongs to the playground
fn logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, o!())
}

fn run(config: Config, logger: &Logger) -> Result<()> {
    info!(logger, "gol initializing";
        "version" => crate_version!(),
        "seed" => config.seed
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let playground = Playground::random(
        config.width,
        config.height,
        config.alive_probability,
        &mut rng,
    );
    let surface = TerminalSurface::new(logger.new(o!("component" => "surface")))?;

    let mut orchestrator = Orchestrator::new(config, playground, Life, surface, logger.clone())?;
    orchestrator.run()
}
