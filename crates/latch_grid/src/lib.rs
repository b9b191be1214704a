//! Latch Grid
//!
//! Spatial partitioning for simulation code:
//! - World space to integer cell coordinates (floor semantics on every axis)
//! - Bit-packed 64-bit cell IDs with a per-axis width
//! - Cell-local containment and coordinate transforms
//!
//! A [`Grid`] is immutable once built and can be shared freely between
//! threads. [`GridCell`] values borrow the grid that produced them.

pub mod axis_mask;
pub mod cell;
mod error;
pub mod grid;
pub mod math;
mod persist;

pub use axis_mask::AxisMask;
pub use cell::GridCell;
pub use error::{GridError, GridResult};
pub use grid::{Axis, Grid};

pub use glam;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
