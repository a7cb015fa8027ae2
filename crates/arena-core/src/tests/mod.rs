//! Crate-level tests that drive a whole [`World`](crate::world::World).
//!
//! - `determinism.rs`: same seed and inputs give identical frames
//! - `integration.rs`: end-to-end match scenarios
//! - `helpers.rs`: world factories and input scripts

mod determinism;
mod helpers;

pub use helpers::*;
