//! Persisted form of a [`Grid`].
//!
//! Grids saved before per-axis widths existed carry only their spacing.
//! Loading such a record rebuilds the widths with the default formula, so
//! IDs encoded by the old grid keep decoding to the same cells.

use crate::error::GridError;
use crate::grid::{default_bits, Grid};
use crate::math::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GridData {
    spacing: [i32; 3],
    /// Missing in legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bits: Option<[u32; 3]>,
}

impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        Self {
            spacing: grid.spacing().to_array(),
            bits: Some(grid.bit_allocation().to_array()),
        }
    }
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let spacing = IVec3::from_array(data.spacing);
        let bits = match data.bits {
            Some(bits) => UVec3::from_array(bits),
            None => {
                let bits = default_bits(spacing);
                tracing::debug!(?spacing, ?bits, "rebuilt bit allocation for legacy grid");
                bits
            }
        };
        Grid::with_bits(spacing, bits)
    }
}
