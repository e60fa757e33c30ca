//! Simulation driver and trace loading.
//!
//! Provides the [`Simulator`] that replays a trace through a [`CacheSim`](crate::CacheSim)
//! and utilities for opening trace files from disk.

pub mod loader;
pub mod simulator;

pub use simulator::{Simulator, simulate};
