//! Run-time configuration for the attention block and the batch source.
//!
//! Both structs carry sensible defaults, can be deserialized with `serde`, and
//! accept environment overrides (`ATTN_*` variables) for quick experiments
//! without recompiling.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::matrix::DEFAULT_INIT_STD;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for [`SelfAttention`](crate::nn::SelfAttention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Width of each token vector; also the query/key/value width.
    pub d_model: usize,
    /// Standard deviation of the Gaussian used for W_Q, W_K and W_V.
    pub init_std: f64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            d_model: 64,
            init_std: DEFAULT_INIT_STD,
        }
    }
}

impl AttentionConfig {
    pub fn new(d_model: usize) -> Self {
        Self {
            d_model,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.d_model == 0 {
            return Err(invalid("d_model", self.d_model));
        }
        if !(self.init_std.is_finite() && self.init_std >= 0.0) {
            return Err(invalid("init_std", self.init_std));
        }
        Ok(())
    }

    /// Applies `ATTN_D_MODEL` and `ATTN_INIT_STD` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Applies overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ATTN_D_MODEL") {
            self.d_model = parse("ATTN_D_MODEL", &value)?;
        }
        if let Some(value) = lookup("ATTN_INIT_STD") {
            self.init_std = parse("ATTN_INIT_STD", &value)?;
        }
        self.validate()
    }
}

/// Configuration for sampling training batches from a [`TextDataset`](crate::data::TextDataset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of sequences per batch.
    pub batch_size: usize,
    /// Context window length of each sequence.
    pub block_size: usize,
    /// Seed for the sampling RNG.
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 2,
            block_size: 4,
            seed: 123,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", self.batch_size));
        }
        if self.block_size == 0 {
            return Err(invalid("block_size", self.block_size));
        }
        Ok(())
    }

    /// Applies `ATTN_BATCH_SIZE`, `ATTN_BLOCK_SIZE` and `ATTN_SEED` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ATTN_BATCH_SIZE") {
            self.batch_size = parse("ATTN_BATCH_SIZE", &value)?;
        }
        if let Some(value) = lookup("ATTN_BLOCK_SIZE") {
            self.block_size = parse("ATTN_BLOCK_SIZE", &value)?;
        }
        if let Some(value) = lookup("ATTN_SEED") {
            self.seed = parse("ATTN_SEED", &value)?;
        }
        self.validate()
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn invalid(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}
