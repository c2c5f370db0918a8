//! Persistable tracer configuration.

use std::path::Path;

use lormarch_kernel::MarchSettings;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::Tracer;

/// On-disk description of a configured tracer.
///
/// Building a tracer validates its configuration once; saving the config
/// lets later runs rebuild an identical tracer without repeating that
/// setup. Fixing `batch_len` additionally pins the batch shape, matching
/// callers that allocate their ray arrays once and resubmit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerConfig {
    /// Voxel extent along each axis.
    pub voxel_size: [f64; 3],
    /// March tunables.
    #[serde(default)]
    pub march: MarchSettings,
    /// Required batch length, if the tracer is pinned to one.
    #[serde(default)]
    pub batch_len: Option<usize>,
}

impl TracerConfig {
    /// Build a validated tracer from this configuration.
    pub fn build(&self) -> Result<Tracer> {
        let tracer = Tracer::new(self.voxel_size, self.march)?;
        Ok(match self.batch_len {
            Some(len) => tracer.with_batch_len(len),
            None => tracer,
        })
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
