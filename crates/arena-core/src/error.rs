//! Errors raised while building a [`World`](crate::world::World).
//!
//! Once a world exists its tick never fails: missing paths, empty magazines
//! and exhausted spawn sampling are ordinary outcomes.

use thiserror::Error;
use tilenav::{GridError, SampleError};

use crate::config::ConfigError;

/// World construction failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// The configuration is inconsistent.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    /// The walkability matrix could not be built.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    /// An initial enemy could not be placed.
    #[error("initial spawn failed: {0}")]
    Spawn(#[from] SampleError),
}
