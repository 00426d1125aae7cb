//! Field simulation and knot accumulation.
//!
//! [`FieldSimulator`] produces the per-step energy/phase grids and folds them
//! into a [`KnotMap`] plus the [`KnotEventLog`] consumed by the projection.

pub mod knot_map;
pub mod simulator;

pub use knot_map::{KnotEventLog, KnotMap};
pub use simulator::{simulate, FieldGrid, FieldSimulator, SimulationRun};
