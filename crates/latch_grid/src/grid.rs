//! Grid coordinate system and packed cell IDs.
//!
//! The grid quantizes every axis independently. An axis with spacing 0 is
//! flattened: every world coordinate maps to cell 0 and the axis takes no
//! bits in a cell ID.

use crate::axis_mask::{AxisMask, MAX_WIDTH};
use crate::cell::GridCell;
use crate::error::{GridError, GridResult};
use crate::math::{floor_to_i32, DVec3, IVec3, UVec3};
use crate::persist::GridData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three spatial axes, in packing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes from most to least significant in a cell ID.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// A partitioning of space into evenly spaced cells.
///
/// Spacing may differ per axis; a common setup is a 2D grid over the x/z
/// plane with y flattened (see [`Grid::planar`]).
///
/// Cell ID format (x most significant, flattened axes skipped):
///
/// ```text
/// [ x: bits.x | y: bits.y | z: bits.z | unused ]   <- low bits hold z
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct Grid {
    spacing: IVec3,
    masks: [AxisMask; 3],
}

impl Grid {
    /// Create a grid with the default bit allocation of `64 / dimensions`
    /// bits per partitioned axis.
    pub fn new(spacing: IVec3) -> GridResult<Self> {
        Self::with_bits(spacing, default_bits(spacing))
    }

    /// Create a grid with an explicit per-axis bit allocation.
    pub fn with_bits(spacing: IVec3, bits: UVec3) -> GridResult<Self> {
        if let Err(err) = validate(spacing, bits) {
            tracing::warn!(?spacing, ?bits, %err, "rejected grid configuration");
            return Err(err);
        }
        tracing::debug!(?spacing, ?bits, "grid created");
        Ok(Self::build(spacing, bits))
    }

    /// Same spacing along every axis.
    pub fn uniform(spacing: i32) -> GridResult<Self> {
        Self::new(IVec3::splat(spacing))
    }

    /// x/z grid with no partitioning along y.
    pub fn planar(x_spacing: i32, z_spacing: i32) -> GridResult<Self> {
        Self::new(IVec3::new(x_spacing, 0, z_spacing))
    }

    fn build(spacing: IVec3, bits: UVec3) -> Self {
        Self {
            spacing,
            masks: [
                AxisMask::new(bits.x),
                AxisMask::new(bits.y),
                AxisMask::new(bits.z),
            ],
        }
    }

    #[inline]
    pub fn spacing(&self) -> IVec3 {
        self.spacing
    }

    /// Bits reserved for each axis in a cell ID.
    pub fn bit_allocation(&self) -> UVec3 {
        UVec3::new(
            self.masks[0].width(),
            self.masks[1].width(),
            self.masks[2].width(),
        )
    }

    /// Number of partitioned axes.
    pub fn dimensions(&self) -> u32 {
        active_axes(self.spacing)
    }

    #[inline]
    pub fn axis_mask(&self, axis: Axis) -> &AxisMask {
        &self.masks[axis.index()]
    }

    /// Quantize one world coordinate with floor semantics.
    ///
    /// `spacing` must be non-negative; 0 flattens the axis.
    pub fn world_to_cell_axis(world: f64, spacing: i32) -> i32 {
        if spacing == 0 {
            return 0;
        }
        let i = floor_to_i32(world);
        if i < 0 {
            // -spacing..=-1 is cell -1, not split between -1 and 0
            (i + 1) / spacing - 1
        } else {
            i / spacing
        }
    }

    /// World coordinate of a cell's minimum corner along one axis.
    #[inline]
    pub fn cell_to_world_axis(cell: i32, spacing: i32) -> i32 {
        cell.wrapping_mul(spacing)
    }

    /// Cell coordinate containing `world`.
    pub fn world_to_cell(&self, world: DVec3) -> IVec3 {
        IVec3::new(
            Self::world_to_cell_axis(world.x, self.spacing.x),
            Self::world_to_cell_axis(world.y, self.spacing.y),
            Self::world_to_cell_axis(world.z, self.spacing.z),
        )
    }

    /// World origin (minimum corner) of `cell`.
    pub fn cell_to_world(&self, cell: IVec3) -> IVec3 {
        IVec3::new(
            Self::cell_to_world_axis(cell.x, self.spacing.x),
            Self::cell_to_world_axis(cell.y, self.spacing.y),
            Self::cell_to_world_axis(cell.z, self.spacing.z),
        )
    }

    /// Floating point version of [`cell_to_world`](Self::cell_to_world).
    pub fn cell_to_world_f64(&self, cell: IVec3) -> DVec3 {
        self.cell_to_world(cell).as_dvec3()
    }

    /// Pack a cell coordinate into a 64-bit ID.
    ///
    /// Components outside an axis' signed range are truncated to their low
    /// bits and will not round-trip. Use [`try_cell_to_id`](Self::try_cell_to_id)
    /// to reject them instead.
    pub fn cell_to_id(&self, cell: IVec3) -> u64 {
        Axis::ALL.into_iter().fold(0, |id, axis| {
            let mask = &self.masks[axis.index()];
            mask.encode(i64::from(cell[axis.index()]), mask.make_room(id))
        })
    }

    /// Pack a cell coordinate, failing if any component would be truncated.
    pub fn try_cell_to_id(&self, cell: IVec3) -> GridResult<u64> {
        for axis in Axis::ALL {
            let mask = &self.masks[axis.index()];
            let value = cell[axis.index()];
            if !mask.contains(i64::from(value)) {
                return Err(GridError::CellOutOfRange {
                    axis,
                    value,
                    min: mask.min_value(),
                    max: mask.max_value(),
                });
            }
        }
        Ok(self.cell_to_id(cell))
    }

    /// Unpack an ID produced by [`cell_to_id`](Self::cell_to_id).
    ///
    /// Never fails; a corrupt word or one from a differently configured
    /// grid still yields some coordinate.
    pub fn id_to_cell(&self, id: u64) -> IVec3 {
        let mut cell = IVec3::ZERO;
        let mut word = id;
        for axis in Axis::ALL.into_iter().rev() {
            let mask = &self.masks[axis.index()];
            cell[axis.index()] = mask.decode(word) as i32;
            word = mask.advance(word);
        }
        cell
    }

    /// ID of the cell containing `world`.
    pub fn world_to_id(&self, world: DVec3) -> u64 {
        self.cell_to_id(self.world_to_cell(world))
    }

    /// The cell containing `world`, for cell-local queries.
    pub fn containing_cell(&self, world: DVec3) -> GridCell<'_> {
        GridCell::new(self, self.world_to_cell(world))
    }

    /// The cell at a given cell coordinate.
    pub fn cell(&self, cell: IVec3) -> GridCell<'_> {
        GridCell::new(self, cell)
    }
}

impl Default for Grid {
    /// Uniform 32 unit cells on all three axes.
    fn default() -> Self {
        let spacing = IVec3::splat(32);
        Self::build(spacing, default_bits(spacing))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grid[({}, {}, {})]",
            self.spacing.x, self.spacing.y, self.spacing.z
        )
    }
}

fn active_axes(spacing: IVec3) -> u32 {
    spacing.cmpne(IVec3::ZERO).bitmask().count_ones()
}

/// `64 / dimensions` bits for each partitioned axis, 0 for flattened ones.
///
/// Also used to rebuild the widths of grids persisted before widths were
/// stored.
pub(crate) fn default_bits(spacing: IVec3) -> UVec3 {
    let dimensions = active_axes(spacing);
    if dimensions == 0 {
        return UVec3::ZERO;
    }
    UVec3::select(
        spacing.cmpne(IVec3::ZERO),
        UVec3::splat(MAX_WIDTH / dimensions),
        UVec3::ZERO,
    )
}

fn validate(spacing: IVec3, bits: UVec3) -> GridResult<()> {
    if spacing.cmplt(IVec3::ZERO).any() {
        return Err(GridError::invalid(format!(
            "spacing must be non-negative, got {spacing}"
        )));
    }
    if spacing == IVec3::ZERO {
        return Err(GridError::invalid("at least one axis must be partitioned"));
    }
    for axis in Axis::ALL {
        let axis_spacing = spacing[axis.index()];
        let axis_bits = bits[axis.index()];
        if axis_spacing != 0 && axis_bits == 0 {
            return Err(GridError::invalid(format!(
                "{axis} axis has spacing {axis_spacing} but no bits allocated"
            )));
        }
        if axis_spacing == 0 && axis_bits != 0 {
            return Err(GridError::invalid(format!(
                "{axis} axis is flattened but was allocated {axis_bits} bits"
            )));
        }
    }
    let total: u64 = bits.to_array().iter().map(|&b| u64::from(b)).sum();
    if total > u64::from(MAX_WIDTH) {
        return Err(GridError::invalid(format!(
            "bit allocation {bits} uses {total} bits, more than {MAX_WIDTH}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar_16() -> Grid {
        Grid::new(IVec3::new(16, 0, 16)).unwrap()
    }

    #[test]
    fn test_negative_floor_division_boundary() {
        for world in [-32.0, -31.5, -16.0, -1.0, -0.001] {
            assert_eq!(Grid::world_to_cell_axis(world, 32), -1, "world {world}");
        }
        for world in [0.0, 0.5, 16.0, 31.999] {
            assert_eq!(Grid::world_to_cell_axis(world, 32), 0, "world {world}");
        }
        assert_eq!(Grid::world_to_cell_axis(32.0, 32), 1);
        assert_eq!(Grid::world_to_cell_axis(-33.0, 32), -2);
        assert_eq!(Grid::world_to_cell_axis(-64.0, 32), -2);
        assert_eq!(Grid::world_to_cell_axis(-64.5, 32), -3);
    }

    #[test]
    fn test_flattened_axis_is_always_zero() {
        let grid = planar_16();
        for y in [-1e9, -17.0, 0.0, 3.5, 1e9] {
            assert_eq!(grid.world_to_cell(DVec3::new(0.0, y, 0.0)).y, 0);
        }
        assert_eq!(grid.bit_allocation().y, 0);
        assert_eq!(grid.axis_mask(Axis::Y).width(), 0);
    }

    #[test]
    fn test_planar_scenario() {
        let grid = planar_16();
        let cell = grid.world_to_cell(DVec3::new(20.0, 5.0, -5.0));
        assert_eq!(cell, IVec3::new(1, 0, -1));

        let id = grid.cell_to_id(cell);
        assert_eq!(grid.id_to_cell(id), IVec3::new(1, 0, -1));
        assert_eq!(grid.cell_to_world(cell), IVec3::new(16, 0, -16));
        assert_eq!(grid.cell_to_world_f64(cell), DVec3::new(16.0, 0.0, -16.0));
        assert_eq!(grid.world_to_id(DVec3::new(20.0, 5.0, -5.0)), id);
    }

    #[test]
    fn test_default_bit_allocation() {
        assert_eq!(Grid::uniform(8).unwrap().bit_allocation(), UVec3::splat(21));
        assert_eq!(planar_16().bit_allocation(), UVec3::new(32, 0, 32));
        assert_eq!(
            Grid::new(IVec3::new(0, 4, 0)).unwrap().bit_allocation(),
            UVec3::new(0, 64, 0)
        );
        assert_eq!(Grid::default().bit_allocation(), UVec3::splat(21));
        assert_eq!(Grid::default().dimensions(), 3);
        assert_eq!(planar_16().dimensions(), 2);
    }

    #[test]
    fn test_packing_order_is_x_y_z() {
        let grid = Grid::with_bits(IVec3::ONE, UVec3::splat(8)).unwrap();
        assert_eq!(grid.cell_to_id(IVec3::new(1, 2, 3)), 0x01_02_03);

        // Flattened y gives its bits to nobody; z stays in the low word
        let id = planar_16().cell_to_id(IVec3::new(1, 0, -1));
        assert_eq!(id, (1 << 32) | 0xFFFF_FFFF);
    }

    #[test]
    fn test_round_trip_within_range() {
        let grid = Grid::uniform(10).unwrap();
        let (min, max) = (-(1 << 20), (1 << 20) - 1);
        let samples = [min, min + 1, -12_345, -1, 0, 1, 777, max - 1, max];
        for &x in &samples {
            for &y in &samples {
                for &z in &samples {
                    let cell = IVec3::new(x, y, z);
                    assert_eq!(grid.id_to_cell(grid.cell_to_id(cell)), cell);
                }
            }
        }
    }

    #[test]
    fn test_uneven_allocation_round_trip() {
        let grid = Grid::with_bits(IVec3::new(16, 256, 16), UVec3::new(28, 8, 28)).unwrap();
        let cell = IVec3::new(-(1 << 27), 127, (1 << 27) - 1);
        assert_eq!(grid.id_to_cell(grid.cell_to_id(cell)), cell);
        let cell = IVec3::new(5, -128, -9);
        assert_eq!(grid.id_to_cell(grid.cell_to_id(cell)), cell);
    }

    #[test]
    fn test_single_axis_uses_full_word() {
        let grid = Grid::new(IVec3::new(0, 0, 4)).unwrap();
        for z in [i32::MIN, -1, 0, 1, i32::MAX] {
            let cell = IVec3::new(0, 0, z);
            assert_eq!(grid.id_to_cell(grid.cell_to_id(cell)), cell);
        }
        assert_eq!(grid.cell_to_id(IVec3::new(0, 0, -1)), u64::MAX);
    }

    #[test]
    fn test_out_of_range_truncates() {
        let grid = Grid::with_bits(IVec3::ONE, UVec3::splat(8)).unwrap();
        let id = grid.cell_to_id(IVec3::new(0x1_05, 0, 0));
        assert_eq!(grid.id_to_cell(id), IVec3::new(5, 0, 0));
    }

    #[test]
    fn test_strict_encode_rejects_truncation() {
        let grid = Grid::with_bits(IVec3::ONE, UVec3::splat(8)).unwrap();
        assert_eq!(grid.try_cell_to_id(IVec3::new(1, 2, 3)), Ok(0x01_02_03));
        assert_eq!(
            grid.try_cell_to_id(IVec3::new(0, 128, 0)),
            Err(GridError::CellOutOfRange {
                axis: Axis::Y,
                value: 128,
                min: -128,
                max: 127,
            })
        );

        let planar = planar_16();
        assert!(matches!(
            planar.try_cell_to_id(IVec3::new(0, 1, 0)),
            Err(GridError::CellOutOfRange { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_rejects_partitioned_axis_without_bits() {
        let err = Grid::with_bits(IVec3::new(10, 0, 10), UVec3::new(0, 0, 32)).unwrap_err();
        assert!(matches!(err, GridError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("x axis"));
    }

    #[test]
    fn test_rejects_other_bad_configurations() {
        let bad = [
            (IVec3::new(10, 0, 10), UVec3::new(32, 1, 31)),
            (IVec3::splat(10), UVec3::new(32, 32, 1)),
            (IVec3::new(-4, 4, 4), UVec3::splat(21)),
            (IVec3::ZERO, UVec3::ZERO),
        ];
        for (spacing, bits) in bad {
            assert!(
                matches!(
                    Grid::with_bits(spacing, bits),
                    Err(GridError::InvalidConfiguration { .. })
                ),
                "{spacing} / {bits} should be rejected"
            );
        }
        assert!(Grid::uniform(0).is_err());
        assert!(Grid::planar(-1, 16).is_err());
    }

    #[test]
    fn test_oversized_axis_width_is_an_error() {
        let result = Grid::with_bits(IVec3::new(1, 0, 0), UVec3::new(65, 0, 0));
        assert!(matches!(
            result,
            Err(GridError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(planar_16().to_string(), "Grid[(16, 0, 16)]");
        assert_eq!(Axis::Z.to_string(), "z");
    }
}
