//! Tilemap terrain generation library
//!
//! Re-exports modules for use by the viewer binary and tests.

pub mod biomes;
pub mod config;
pub mod context;
pub mod error;
pub mod generation;
pub mod logging;
pub mod random;
pub mod seeds;
pub mod tilemap;
pub mod viewer;
