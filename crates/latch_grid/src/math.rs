//! Vector types used across the grid API
//!
//! Re-exports glam with the floor helper the quantizer relies on

pub use glam::*;

/// Floor a world coordinate to an integer.
///
/// Saturates at the `i32` limits and maps NaN to 0.
#[inline]
pub fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}
