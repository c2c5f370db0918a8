//! Fixed-iteration dual SDF march and LOI aggregation.

use lormarch_math::{Index3, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::grid::VoxelGrid;
use crate::sdf::VoxelBox;

/// Tunables for the dual march.
///
/// Both parameters trade accuracy against throughput and are part of the
/// tracer's persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarchSettings {
    /// Number of marching iterations per ray. Every ray executes exactly
    /// this many iterations; more iterations tighten the boundary
    /// estimate for rays that exit through a corner region.
    pub iterations: u32,
    /// Smallest step taken per iteration. Keeps the march moving when
    /// the SDF is near zero, at the cost of overshooting the boundary by
    /// up to this amount per iteration.
    pub step_floor: f64,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            iterations: 2,
            step_floor: 1e-4,
        }
    }
}

impl MarchSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(KernelError::InvalidSettings(
                "iterations must be at least 1".into(),
            ));
        }
        if !(self.step_floor.is_finite() && self.step_floor > 0.0) {
            return Err(KernelError::InvalidSettings(format!(
                "step_floor must be positive and finite, got {}",
                self.step_floor
            )));
        }
        Ok(())
    }
}

/// Forward and backward boundary-distance estimates for one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSpan {
    /// Estimated distance from the sample point to the cell boundary
    /// along the ray direction.
    pub forward: f64,
    /// Estimated distance to the boundary against the ray direction.
    pub backward: f64,
}

impl MarchSpan {
    /// Total chord length estimate through the cell.
    #[inline]
    pub fn chord(&self) -> f64 {
        self.forward + self.backward
    }
}

/// March outward from `local` in both directions along `direction`.
///
/// `local` must lie inside the cell (which [`VoxelGrid::fold`]
/// guarantees), so the SDF starts non-positive; subtracting
/// `min(sdf, -step_floor)` therefore takes a strictly positive step every
/// iteration, driving both distances toward the two boundary crossings of
/// the line through the cell. The loop runs exactly
/// `settings.iterations` times with no early exit, so control flow is
/// identical for every ray in a batch.
///
/// `direction` must be unit length; this is not checked. A zero
/// direction does not panic but produces a meaningless span.
#[inline]
pub fn march(sdf: &VoxelBox, local: Point3, direction: Vec3, settings: &MarchSettings) -> MarchSpan {
    let mut t_fw = 0.0_f64;
    let mut t_bw = 0.0_f64;
    for _ in 0..settings.iterations {
        let d_fw = sdf.distance(local + t_fw * direction);
        let d_bw = sdf.distance(local - t_bw * direction);
        // The SDF is negative inside the cell, where we always start.
        t_fw -= d_fw.min(-settings.step_floor);
        t_bw -= d_bw.min(-settings.step_floor);
    }
    MarchSpan {
        forward: t_fw,
        backward: t_bw,
    }
}

/// One ray's length of interaction with the voxel containing its sample
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoiRecord {
    /// Chord length scaled by the ray's normalization constant.
    pub loi: f64,
    /// Index of the traversed voxel.
    pub voxel: Index3,
}

impl LoiRecord {
    /// Scale a march span by `norm_const` and attach the voxel index.
    #[inline]
    pub fn new(span: MarchSpan, norm_const: f64, voxel: Index3) -> Self {
        Self {
            loi: norm_const * span.chord(),
            voxel,
        }
    }

    /// Flatten into the `[loi, ix, iy, iz]` row layout used for batch
    /// output.
    #[inline]
    pub fn to_row(&self) -> [f64; 4] {
        [
            self.loi,
            self.voxel.x as f64,
            self.voxel.y as f64,
            self.voxel.z as f64,
        ]
    }
}

/// Run the full per-ray pipeline: fold, march, aggregate.
///
/// `sdf` must be the SDF of `grid`'s cell; it is passed in so batch
/// callers construct it once per batch rather than once per ray.
#[inline]
pub fn trace_ray(
    grid: &VoxelGrid,
    sdf: &VoxelBox,
    point: Point3,
    direction: Vec3,
    norm_const: f64,
    settings: &MarchSettings,
) -> LoiRecord {
    let (voxel, local) = grid.fold(point);
    let span = march(sdf, local, direction, settings);
    LoiRecord::new(span, norm_const, voxel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> (VoxelGrid, VoxelBox) {
        let grid = VoxelGrid::new(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let sdf = VoxelBox::new(&grid);
        (grid, sdf)
    }

    #[test]
    fn test_settings_validation() {
        assert!(MarchSettings::default().validate().is_ok());
        let bad_iters = MarchSettings {
            iterations: 0,
            ..Default::default()
        };
        assert!(bad_iters.validate().is_err());
        let bad_floor = MarchSettings {
            step_floor: 0.0,
            ..Default::default()
        };
        assert!(bad_floor.validate().is_err());
        let nan_floor = MarchSettings {
            step_floor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_floor.validate().is_err());
    }

    #[test]
    fn test_axis_chord_from_center() {
        // Analytic chord through a unit cell along +z is 1.0; two
        // iterations land within the step floor of each half.
        let (_, sdf) = unit_grid();
        let span = march(
            &sdf,
            Point3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 0.0, 1.0),
            &MarchSettings::default(),
        );
        assert!((span.chord() - 1.0).abs() <= 1e-2);
        assert!((span.forward - 0.5).abs() <= 2e-4);
        assert!((span.backward - 0.5).abs() <= 2e-4);
    }

    #[test]
    fn test_axis_chord_off_center() {
        let (_, sdf) = unit_grid();
        let span = march(
            &sdf,
            Point3::new(0.25, 0.5, 0.5),
            Vec3::new(1.0, 0.0, 0.0),
            &MarchSettings::default(),
        );
        assert!((span.forward - 0.75).abs() <= 2e-4);
        assert!((span.backward - 0.25).abs() <= 2e-4);
        assert!((span.chord() - 1.0).abs() <= 1e-2);
    }

    #[test]
    fn test_monotonic_in_iterations() {
        let (_, sdf) = unit_grid();
        let local = Point3::new(0.3, 0.6, 0.5);
        let dir = Vec3::new(1.0, 1.0, 1.0).normalize();
        let mut prev = MarchSpan {
            forward: 0.0,
            backward: 0.0,
        };
        for iterations in 1..8 {
            let settings = MarchSettings {
                iterations,
                ..Default::default()
            };
            let span = march(&sdf, local, dir, &settings);
            assert!(span.forward >= prev.forward);
            assert!(span.backward >= prev.backward);
            prev = span;
        }
    }

    #[test]
    fn test_diagonal_corner_exit_converges_slowly() {
        // Corner exits converge slowly; the estimate must stay below the
        // analytic chord (plus the step-floor overshoot) and grow with
        // more iterations.
        let (_, sdf) = unit_grid();
        let dir = Vec3::new(1.0, 1.0, 1.0).normalize();
        let local = Point3::new(0.5, 0.5, 0.5);
        let defaults = MarchSettings::default();
        let span = march(&sdf, local, dir, &defaults);
        let analytic = 3.0_f64.sqrt();
        assert!(span.chord() <= analytic + 2.0 * defaults.iterations as f64 * defaults.step_floor);
        let more = march(
            &sdf,
            local,
            dir,
            &MarchSettings {
                iterations: 16,
                ..defaults
            },
        );
        assert!(more.chord() > span.chord());
        assert!((more.chord() - analytic).abs() < 1e-2);
    }

    #[test]
    fn test_degenerate_direction_is_finite() {
        // Zero directions are a documented caller error; they must not
        // panic or produce NaN.
        let (_, sdf) = unit_grid();
        let span = march(
            &sdf,
            Point3::new(0.5, 0.5, 0.5),
            Vec3::zeros(),
            &MarchSettings::default(),
        );
        assert!(span.forward.is_finite());
        assert!(span.backward.is_finite());
    }

    #[test]
    fn test_loi_nonnegative_and_scaled() {
        let (grid, sdf) = unit_grid();
        let settings = MarchSettings::default();
        let rec = trace_ray(
            &grid,
            &sdf,
            Point3::new(1.5, -0.5, 0.5),
            Vec3::new(0.0, 0.0, 1.0),
            2.5,
            &settings,
        );
        assert_eq!(rec.voxel, Index3::new(1, -1, 0));
        assert!(rec.loi >= 0.0);
        assert!((rec.loi - 2.5).abs() <= 2.5 * 1e-2);
    }

    #[test]
    fn test_to_row_layout() {
        let rec = LoiRecord {
            loi: 0.75,
            voxel: Index3::new(4, -2, 9),
        };
        assert_eq!(rec.to_row(), [0.75, 4.0, -2.0, 9.0]);
    }

    #[test]
    fn test_zero_norm_const_zeroes_loi() {
        let (grid, sdf) = unit_grid();
        let rec = trace_ray(
            &grid,
            &sdf,
            Point3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 1.0, 0.0),
            0.0,
            &MarchSettings::default(),
        );
        assert_eq!(rec.loi, 0.0);
    }
}
