//! Configuration and the per-collection random session.

use std::cell::RefCell;
use std::path::Path;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

// Using a concrete, seedable PRNG so seeded sessions replay exactly.
pub type SmallRng = Xoshiro256StarStar;

/// Environment variable that pins the random seed.
pub const SEED_ENV_VAR: &str = "GEN_STRING_SEED";

/// Tunables for value generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Seed for the random source. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Length used when a named kind is generated without a `length` option.
    #[serde(default = "default_length")]
    pub default_length: usize,

    /// Attempts made before a validator falls back to its `default`.
    #[serde(default = "default_tries")]
    pub default_tries: usize,
}

fn default_length() -> usize {
    10
}

fn default_tries() -> usize {
    10
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_length: default_length(),
            default_tries: default_tries(),
        }
    }
}

impl GenConfig {
    /// Parses a configuration document in YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, GenStringError> {
        let config: GenConfig = serde_yaml::from_str(content)
            .map_err(|e| GenStringError::config("invalid configuration document", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GenStringError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenStringError::config(format!("failed to read '{}'", path.display()), e)
        })?;
        Self::from_yaml_str(&content)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, GenStringError> {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => self.with_seed_str(&raw),
            Err(_) => Ok(self),
        }
    }

    fn with_seed_str(mut self, raw: &str) -> Result<Self, GenStringError> {
        let seed = raw.trim().parse::<u64>().map_err(|e| {
            GenStringError::config(format!("{} must be an unsigned integer", SEED_ENV_VAR), e)
        })?;
        self.seed = Some(seed);
        Ok(self)
    }

    fn validate(&self) -> Result<(), GenStringError> {
        if self.default_length == 0 {
            return Err(GenStringError::Config {
                message: "default_length must be greater than 0".to_string(),
                ctx: ErrorContext::none(),
                source: None,
            });
        }
        if self.default_tries == 0 {
            return Err(GenStringError::Config {
                message: "default_tries must be greater than 0".to_string(),
                ctx: ErrorContext::none(),
                source: None,
            });
        }
        Ok(())
    }
}

/// Random source plus configuration shared by one collection pass.
///
/// Generation borrows the session immutably; the random state lives behind a
/// `RefCell` so callables and nested generators can all draw from it.
#[derive(Debug)]
pub struct Session {
    config: GenConfig,
    prng: RefCell<SmallRng>,
}

impl Session {
    pub fn new(config: GenConfig) -> Self {
        let prng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            prng: RefCell::new(prng),
        }
    }

    /// A session with a fixed seed and default settings.
    pub fn seeded(seed: u64) -> Self {
        Self::new(GenConfig {
            seed: Some(seed),
            ..GenConfig::default()
        })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Runs `f` with exclusive access to the random source.
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut SmallRng) -> R) -> R {
        f(&mut self.prng.borrow_mut())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GenConfig::default())
    }
}
