//! A single cell of a [`Grid`] and its cell-local transforms.

use crate::grid::{Axis, Grid};
use crate::math::{DVec3, IVec3};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One concrete cell of a grid.
///
/// Borrows the grid it came from. Two cells are equal only when they belong
/// to the same grid instance and share a cell coordinate; an identically
/// configured but separate grid produces unequal cells.
#[derive(Debug, Clone, Copy)]
pub struct GridCell<'g> {
    grid: &'g Grid,
    cell: IVec3,
    world_origin: IVec3,
}

impl<'g> GridCell<'g> {
    pub fn new(grid: &'g Grid, cell: IVec3) -> Self {
        Self {
            grid,
            cell,
            world_origin: grid.cell_to_world(cell),
        }
    }

    #[inline]
    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    #[inline]
    pub fn cell(&self) -> IVec3 {
        self.cell
    }

    /// Minimum corner of the cell in world space.
    #[inline]
    pub fn world_origin(&self) -> IVec3 {
        self.world_origin
    }

    /// Whether `world` lies inside this cell.
    ///
    /// Both bounds are inclusive, so a point on a shared face belongs to
    /// both neighbours. Flattened axes are not checked.
    pub fn contains(&self, world: DVec3) -> bool {
        let spacing = self.grid.spacing();
        let local = self.world_to_local(world);
        Axis::ALL.into_iter().all(|axis| {
            let size = spacing[axis.index()];
            let offset = local[axis.index()];
            size == 0 || (0.0..=f64::from(size)).contains(&offset)
        })
    }

    pub fn world_to_local(&self, world: DVec3) -> DVec3 {
        world - self.world_origin.as_dvec3()
    }

    pub fn local_to_world(&self, local: DVec3) -> DVec3 {
        self.world_origin.as_dvec3() + local
    }

    /// Integer version of [`local_to_world`](Self::local_to_world); wraps on overflow.
    pub fn local_to_world_ivec3(&self, local: IVec3) -> IVec3 {
        self.world_origin.wrapping_add(local)
    }
}

impl PartialEq for GridCell<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.grid, other.grid) && self.cell == other.cell
    }
}

impl Eq for GridCell<'_> {}

impl Hash for GridCell<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.hash(state);
    }
}

impl fmt::Display for GridCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}:{})", self.cell.x, self.cell.y, self.cell.z)
    }
}
