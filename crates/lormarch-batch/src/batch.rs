//! Ray batch container and LOR sampling.

use lormarch_math::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};

/// A batch of rays held as parallel arrays.
///
/// Rows are `(point, direction, norm_const)` triples; `directions` must
/// hold unit vectors (enforced by [`RayBatch::push_lor`], the caller's
/// responsibility for [`RayBatch::push`]). This is also the on-disk JSON
/// layout the CLI reads and writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RayBatch {
    /// Absolute sample points, one row per ray.
    pub points: Vec<[f64; 3]>,
    /// Unit ray directions, one row per ray.
    pub directions: Vec<[f64; 3]>,
    /// Per-ray normalization constants.
    pub norm_consts: Vec<f64>,
}

impl RayBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rays in the batch.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the batch holds no rays.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append one ray.
    pub fn push(&mut self, point: [f64; 3], direction: [f64; 3], norm_const: f64) {
        self.points.push(point);
        self.directions.push(direction);
        self.norm_consts.push(norm_const);
    }

    /// Append `samples` rays spaced evenly along a line of response.
    ///
    /// Sample points sit at the midpoints of `samples` equal subdivisions
    /// of the segment, all sharing the segment's unit direction and
    /// `norm_const`. The points are positions to march outward from, not
    /// voxel entry coordinates.
    pub fn push_lor(
        &mut self,
        start: Point3,
        end: Point3,
        samples: usize,
        norm_const: f64,
    ) -> Result<()> {
        let span = end - start;
        let length = span.norm();
        if length == 0.0 {
            return Err(TraceError::DegenerateLor);
        }
        let direction = span / length;
        for i in 0..samples {
            let t = (i as f64 + 0.5) / samples as f64;
            let p = start + t * span;
            self.push([p.x, p.y, p.z], [direction.x, direction.y, direction.z], norm_const);
        }
        Ok(())
    }
}
