use serde::{Deserialize, Serialize};

use voxray_voxels::FinalizeConfig;

/// User settings, stored as `settings.yaml` in the save root.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub finalize: FinalizeConfig,
    #[serde(default)]
    pub demo: DemoWorldConfig,
}

/// Shape of the world written by `generate-demo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoWorldConfig {
    /// Number of chunk columns along each horizontal axis.
    pub columns: i64,
    /// First y level above the ground.
    pub ground_level: i64,
    pub seed: u64,
}

impl Default for DemoWorldConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            ground_level: 40,
            seed: 0,
        }
    }
}
