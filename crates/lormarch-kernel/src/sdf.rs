//! Signed distance to the surface of a grid cell.

use lormarch_math::{Point3, Vec3};

use crate::grid::VoxelGrid;

/// Signed distance field of the axis-aligned box `[0, voxel_size]`.
///
/// Distances are negative strictly inside the box, zero on the surface,
/// and positive outside. This is the Chebyshev-style box SDF: each axis
/// contributes `|p - c| - c` where `c` is the box center (and half
/// extent), and the axes combine by maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelBox {
    center: Vec3,
}

impl VoxelBox {
    /// The SDF of one cell of `grid`.
    #[inline]
    pub fn new(grid: &VoxelGrid) -> Self {
        Self {
            center: grid.size() / 2.0,
        }
    }

    /// Evaluate the signed distance at a point in cell-local coordinates.
    #[inline]
    pub fn distance(&self, p: Point3) -> f64 {
        let dx = (p.x - self.center.x).abs() - self.center.x;
        let dy = (p.y - self.center.y).abs() - self.center.y;
        let dz = (p.z - self.center.z).abs() - self.center.z;
        dx.max(dy).max(dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> VoxelBox {
        let grid = VoxelGrid::new(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        VoxelBox::new(&grid)
    }

    #[test]
    fn test_center_is_deepest() {
        let sdf = unit_box();
        assert_relative_eq!(sdf.distance(Point3::new(0.5, 0.5, 0.5)), -0.5);
    }

    #[test]
    fn test_zero_on_faces() {
        let sdf = unit_box();
        assert_relative_eq!(sdf.distance(Point3::new(1.0, 0.5, 0.5)), 0.0);
        assert_relative_eq!(sdf.distance(Point3::new(0.0, 0.5, 0.5)), 0.0);
        assert_relative_eq!(sdf.distance(Point3::new(0.5, 0.5, 1.0)), 0.0);
    }

    #[test]
    fn test_positive_outside() {
        let sdf = unit_box();
        assert_relative_eq!(sdf.distance(Point3::new(1.5, 0.5, 0.5)), 0.5);
        assert!(sdf.distance(Point3::new(-0.25, 0.5, 0.5)) > 0.0);
    }

    #[test]
    fn test_nonpositive_inside() {
        let sdf = unit_box();
        for &x in &[0.01, 0.25, 0.5, 0.75, 0.99] {
            for &y in &[0.1, 0.9] {
                assert!(sdf.distance(Point3::new(x, y, 0.5)) <= 0.0);
            }
        }
    }

    #[test]
    fn test_anisotropic_cell() {
        let grid = VoxelGrid::new(Vec3::new(2.0, 1.0, 4.0)).unwrap();
        let sdf = VoxelBox::new(&grid);
        // Center of the cell: nearest face is the y pair at distance 0.5.
        assert_relative_eq!(sdf.distance(Point3::new(1.0, 0.5, 2.0)), -0.5);
        assert_relative_eq!(sdf.distance(Point3::new(2.0, 0.5, 2.0)), 0.0);
    }
}
