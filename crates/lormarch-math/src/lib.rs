#![warn(missing_docs)]

//! Math types for the lormarch ray-marching kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types
//! for PET ray geometry: points, vectors, and integer voxel indices.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// An integer 3D voxel index.
pub type Index3 = Vector3<i64>;

/// Check whether `v` has unit length within `tol`.
///
/// Ray directions are required to be normalized by the caller; this is
/// the predicate tests and samplers use to assert that.
#[inline]
pub fn is_unit(v: &Vec3, tol: f64) -> bool {
    (v.norm() - 1.0).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unit() {
        assert!(is_unit(&Vec3::new(1.0, 0.0, 0.0), 1e-12));
        let d = Vec3::new(1.0, 1.0, 1.0).normalize();
        assert!(is_unit(&d, 1e-12));
        assert!(!is_unit(&Vec3::new(1.0, 1.0, 1.0), 1e-6));
        assert!(!is_unit(&Vec3::zeros(), 1e-6));
    }
}
