use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Size of the playground in X dimension
pub const DIM_X: usize = 200;
/// Size of the playground in Y dimension
pub const DIM_Y: usize = 200;
/// Probability threshold that a cell is initially alive
pub const ALIVE_PROBABILITY: f32 = 0.3125;
pub const POOL_SIZE: usize = 50;
/// Sleep time between generations in milliseconds
pub const TICK_MILLIS: u64 = 200;

/// Settings of one simulation run.
///
/// Read from JSON with camelCase keys, every key optional:
///
/// ```
/// use gol::Config;
///
/// let config: Config = serde_json::from_str(r#"{"width": 3, "poolSize": 2}"#).unwrap();
/// assert_eq!(config.width, 3);
/// assert_eq!(config.pool_size, 2);
/// assert_eq!(config.height, gol::config::DIM_Y);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub alive_probability: f32,
    pub pool_size: usize,
    pub tick_millis: u64,
    // run forever when unset
    pub generations: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DIM_X,
            height: DIM_Y,
            alive_probability: ALIVE_PROBABILITY,
            pool_size: POOL_SIZE,
            tick_millis: TICK_MILLIS,
            generations: None,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_config(format!(
                "playground must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(Error::invalid_config(format!(
                "{}x{} playground has more cells than fit in memory",
                self.width, self.height
            )));
        }
        if self.pool_size == 0 {
            return Err(Error::invalid_config(
                "pool needs at least one worker".to_string(),
            ));
        }
        // also rejects NaN
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(Error::invalid_config(format!(
                "alive probability {} is not within [0, 1]",
                self.alive_probability
            )));
        }
        Ok(())
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
