#![warn(missing_docs)]

//! Data-parallel batch execution for the lormarch LOI kernel.
//!
//! A [`Tracer`] captures a validated grid and march configuration once
//! and then applies the per-ray kernel over arbitrarily large batches of
//! rays with no cross-ray state. Batches are validated up front: a call
//! either fully computes or fails before any per-ray work.
//!
//! # Example
//!
//! ```
//! use lormarch_batch::{RayBatch, Tracer};
//! use lormarch_kernel::MarchSettings;
//! use lormarch_math::Point3;
//!
//! let tracer = Tracer::new([1.0, 1.0, 1.0], MarchSettings::default())?;
//!
//! let mut rays = RayBatch::new();
//! rays.push_lor(Point3::new(0.0, 0.5, 0.5), Point3::new(4.0, 0.5, 0.5), 8, 1.0)?;
//!
//! let records = tracer.trace_batch(&rays)?;
//! assert_eq!(records.len(), 8);
//! assert!(records.iter().all(|r| r.loi >= 0.0));
//! # Ok::<(), lormarch_batch::TraceError>(())
//! ```

mod batch;
mod config;
mod error;

pub use batch::RayBatch;
pub use config::TracerConfig;
pub use error::{Result, TraceError};

use lormarch_kernel::{trace_ray, LoiRecord, MarchSettings, VoxelBox, VoxelGrid};
use lormarch_math::{Point3, Vec3};
use rayon::prelude::*;

/// A configured batch tracer.
///
/// Construction validates the voxel size and march settings; tracing is
/// then a pure function of the submitted arrays. `Tracer` is `Sync`, so
/// a shared reference can serve concurrent batch calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    grid: VoxelGrid,
    sdf: VoxelBox,
    settings: MarchSettings,
    batch_len: Option<usize>,
}

impl Tracer {
    /// Create a tracer for the given voxel size and march settings.
    pub fn new(voxel_size: [f64; 3], settings: MarchSettings) -> Result<Self> {
        settings.validate()?;
        let grid = VoxelGrid::new(Vec3::new(voxel_size[0], voxel_size[1], voxel_size[2]))?;
        Ok(Self {
            grid,
            sdf: VoxelBox::new(&grid),
            settings,
            batch_len: None,
        })
    }

    /// Pin the tracer to batches of exactly `len` rays.
    ///
    /// Pinned tracers reject any other batch size, for callers that
    /// allocate their ray arrays once and resubmit them every call.
    #[must_use]
    pub fn with_batch_len(mut self, len: usize) -> Self {
        self.batch_len = Some(len);
        self
    }

    /// The grid rays are folded into.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The march tunables in effect.
    pub fn settings(&self) -> MarchSettings {
        self.settings
    }

    /// The persistable description of this tracer.
    pub fn config(&self) -> TracerConfig {
        let size = self.grid.size();
        TracerConfig {
            voxel_size: [size.x, size.y, size.z],
            march: self.settings,
            batch_len: self.batch_len,
        }
    }

    /// Trace a batch of rays given as parallel arrays.
    ///
    /// `directions` rows must be unit vectors; this is a documented
    /// caller precondition, not checked here (a zero direction yields a
    /// finite but meaningless record). Returns one [`LoiRecord`] per ray,
    /// in input order. An empty batch returns an empty vec.
    pub fn trace(
        &self,
        points: &[[f64; 3]],
        directions: &[[f64; 3]],
        norm_consts: &[f64],
    ) -> Result<Vec<LoiRecord>> {
        self.validate_lengths(points.len(), directions.len(), norm_consts.len())?;

        let records = points
            .par_iter()
            .zip(directions.par_iter())
            .zip(norm_consts.par_iter())
            .map(|((p, d), &norm)| {
                trace_ray(
                    &self.grid,
                    &self.sdf,
                    Point3::new(p[0], p[1], p[2]),
                    Vec3::new(d[0], d[1], d[2]),
                    norm,
                    &self.settings,
                )
            })
            .collect();

        Ok(records)
    }

    /// Trace a [`RayBatch`].
    pub fn trace_batch(&self, batch: &RayBatch) -> Result<Vec<LoiRecord>> {
        self.trace(&batch.points, &batch.directions, &batch.norm_consts)
    }

    /// Trace and flatten each record into a `[loi, ix, iy, iz]` row.
    pub fn trace_rows(
        &self,
        points: &[[f64; 3]],
        directions: &[[f64; 3]],
        norm_consts: &[f64],
    ) -> Result<Vec<[f64; 4]>> {
        Ok(self
            .trace(points, directions, norm_consts)?
            .iter()
            .map(LoiRecord::to_row)
            .collect())
    }

    fn validate_lengths(&self, points: usize, directions: usize, norm_consts: usize) -> Result<()> {
        if directions != points {
            return Err(TraceError::LengthMismatch {
                name: "directions",
                expected: points,
                got: directions,
            });
        }
        if norm_consts != points {
            return Err(TraceError::LengthMismatch {
                name: "norm_consts",
                expected: points,
                got: norm_consts,
            });
        }
        if let Some(expected) = self.batch_len {
            if points != expected {
                return Err(TraceError::BatchLength {
                    expected,
                    got: points,
                });
            }
        }
        Ok(())
    }
}
