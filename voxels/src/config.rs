use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::block::Block;

/// User-facing finalizer options, as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeConfig {
    /// Exclusive upper bound of world y coordinates.
    #[serde(default = "FinalizeConfig::default_y_max")]
    pub y_max: i64,
    /// Replace hidden opaque voxels on chunk borders with the filler block.
    #[serde(default = "FinalizeConfig::default_occlusion_merge")]
    pub occlusion_merge: bool,
    #[serde(default = "FinalizeConfig::default_filler_block")]
    pub filler_block: String,
    #[serde(default = "FinalizeConfig::default_worker_threads")]
    pub worker_threads: usize,
}

/// Validated finalizer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeSettings {
    pub y_max: i64,
    pub occlusion_merge: bool,
    pub filler: Block,
    pub worker_threads: usize,
}

impl FinalizeConfig {
    pub fn default_y_max() -> i64 {
        256
    }
    pub fn default_occlusion_merge() -> bool {
        true
    }
    pub fn default_filler_block() -> String {
        "stone".into()
    }
    pub fn default_worker_threads() -> usize {
        4
    }

    pub fn validate(&self) -> Result<FinalizeSettings> {
        let filler = Block::by_name(&self.filler_block)
            .ok_or_else(|| anyhow!("unknown filler block \"{}\"", self.filler_block))?;
        if !filler.is_opaque() {
            bail!("filler block \"{}\" must be opaque", self.filler_block);
        }
        if self.y_max < 3 {
            bail!("y_max must be at least 3, got {}", self.y_max);
        }
        if self.worker_threads == 0 {
            bail!("worker_threads must be at least 1");
        }

        Ok(FinalizeSettings {
            y_max: self.y_max,
            occlusion_merge: self.occlusion_merge,
            filler,
            worker_threads: self.worker_threads,
        })
    }
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        FinalizeConfig {
            y_max: Self::default_y_max(),
            occlusion_merge: Self::default_occlusion_merge(),
            filler_block: Self::default_filler_block(),
            worker_threads: Self::default_worker_threads(),
        }
    }
}

impl Default for FinalizeSettings {
    fn default() -> Self {
        FinalizeSettings {
            y_max: FinalizeConfig::default_y_max(),
            occlusion_merge: FinalizeConfig::default_occlusion_merge(),
            filler: Block::STONE,
            worker_threads: FinalizeConfig::default_worker_threads(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: FinalizeConfig = serde_yaml::from_str("occlusion_merge: false").unwrap();
        assert_eq!(config.y_max, 256);
        assert!(!config.occlusion_merge);
        assert_eq!(config.filler_block, "stone");

        let settings = FinalizeConfig::default().validate().unwrap();
        assert_eq!(settings, FinalizeSettings::default());
    }

    #[test]
    fn test_validate() {
        let mut config = FinalizeConfig::default();
        config.filler_block = "netherrack".into();
        assert_eq!(config.validate().unwrap().filler, Block(87));

        config.filler_block = "glass".into();
        assert!(config.validate().is_err());

        config.filler_block = "granite".into();
        assert!(config.validate().is_err());

        let config = FinalizeConfig {
            y_max: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FinalizeConfig {
            worker_threads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
