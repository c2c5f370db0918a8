#![warn(missing_docs)]

//! SDF ray-marching voxel intersection kernel for PET projection.
//!
//! Estimates the chord length (length of interaction, LOI) a line of
//! response spends inside the voxel containing a given sample point.
//! Instead of a Siddon-style traversal, each ray is folded into its
//! voxel's local frame and marched outward in both directions with a
//! fixed number of signed-distance steps, which keeps control flow
//! uniform across arbitrarily large batches.
//!
//! # Architecture
//!
//! - [`VoxelGrid`] - folds absolute points into (voxel index, local position)
//! - [`VoxelBox`] - signed distance to the surface of one grid cell
//! - [`march`] - fixed-iteration forward/backward boundary march
//! - [`LoiRecord`] - normalized chord length plus voxel index
//!
//! # Example
//!
//! ```
//! use lormarch_kernel::{march, LoiRecord, MarchSettings, VoxelBox, VoxelGrid};
//! use lormarch_math::{Point3, Vec3};
//!
//! let grid = VoxelGrid::new(Vec3::new(1.0, 1.0, 1.0))?;
//! let sdf = VoxelBox::new(&grid);
//! let settings = MarchSettings::default();
//!
//! let (voxel, local) = grid.fold(Point3::new(1.5, -0.5, 0.5));
//! let span = march(&sdf, local, Vec3::new(0.0, 0.0, 1.0), &settings);
//! let record = LoiRecord::new(span, 1.0, voxel);
//! assert!((record.loi - 1.0).abs() < 1e-2);
//! # Ok::<(), lormarch_kernel::KernelError>(())
//! ```

mod error;
mod grid;
mod march;
mod sdf;

pub use error::{KernelError, Result};
pub use grid::VoxelGrid;
pub use march::{march, trace_ray, LoiRecord, MarchSettings, MarchSpan};
pub use sdf::VoxelBox;
