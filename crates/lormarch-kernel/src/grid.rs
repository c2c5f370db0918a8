//! Voxel grid coordinate folding.

use lormarch_math::{Index3, Point3, Vec3};

use crate::error::{KernelError, Result};

/// The periodic voxel grid that ray sample points are folded into.
///
/// The grid partitions space into axis-aligned cells of extent
/// `voxel_size`; cell `(i, j, k)` occupies
/// `[i * sx, (i+1) * sx) × [j * sy, (j+1) * sy) × [k * sz, (k+1) * sz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelGrid {
    size: Vec3,
}

impl VoxelGrid {
    /// Create a grid with the given cell extents.
    ///
    /// Every component must be strictly positive and finite.
    pub fn new(size: Vec3) -> Result<Self> {
        for (axis, s) in ["x", "y", "z"].into_iter().zip(size.iter()) {
            if !(s.is_finite() && *s > 0.0) {
                return Err(KernelError::InvalidVoxelSize(format!(
                    "{axis} extent must be positive and finite, got {s}"
                )));
            }
        }
        Ok(Self { size })
    }

    /// Cell extent along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Fold an absolute point into (voxel index, position within the cell).
    ///
    /// The index is the mathematical floor of `point / size` per axis
    /// (true floor, so negative coordinates land in the correct cell),
    /// and the local position satisfies `0 <= local < size` per axis.
    #[inline]
    pub fn fold(&self, point: Point3) -> (Index3, Point3) {
        let fx = (point.x / self.size.x).floor();
        let fy = (point.y / self.size.y).floor();
        let fz = (point.z / self.size.z).floor();
        let index = Index3::new(fx as i64, fy as i64, fz as i64);
        let local = Point3::new(
            point.x - fx * self.size.x,
            point.y - fy * self.size.y,
            point.z - fz * self.size.z,
        );
        (index, local)
    }
}
