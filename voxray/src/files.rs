use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use cgmath::Point3;
use directories::UserDirs;
use serde::{Deserialize, Serialize};

use voxray_voxels::{ChunkColumn, VoxelData};

use crate::settings::Settings;

const APP_DIR_NAME: &str = "voxray";
const SETTINGS_FILE_NAME: &str = "settings.yaml";
const SAVE_DIR_NAME: &str = "saves";
const WORLD_META_FILE_NAME: &str = "world_meta.yaml";
const VOXEL_DATA_FILE_NAME: &str = "voxel_data.dat";

pub struct FileContext {
    /// Root directory for saved worlds.
    pub save_root: PathBuf,
    /// Location of the user settings file.
    pub settings_path: PathBuf,
}

/// Describes the voxel data stored next to it in a save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldMeta {
    /// World position of voxel index coordinate zero.
    pub origin: Point3<i64>,
    /// Columns to finalize, in the order they were loaded.
    pub columns: Vec<ChunkColumn>,
    pub finalized: bool,
}

impl FileContext {
    pub fn new(root: PathBuf) -> Self {
        let mut save_root = root.clone();
        save_root.push(SAVE_DIR_NAME);

        let mut settings_path = root;
        settings_path.push(SETTINGS_FILE_NAME);

        FileContext {
            save_root,
            settings_path,
        }
    }

    /// File context rooted in `<documents>/voxray`.
    pub fn load_default() -> Result<Self> {
        let user_dirs =
            UserDirs::new().ok_or_else(|| anyhow!("Could not find user directories."))?;
        let docs_dir = user_dirs
            .document_dir()
            .ok_or_else(|| anyhow!("Could not find document directory."))?;

        let mut root = PathBuf::new();
        root.push(docs_dir);
        root.push(APP_DIR_NAME);
        Ok(FileContext::new(root))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.save_root).context(format!(
            "Creating save directory {}",
            self.save_root.to_string_lossy()
        ))?;
        Ok(())
    }

    pub fn load_settings(&self) -> Result<Settings> {
        let fp = &self.settings_path;
        if fp.is_file() {
            log::info!("Loading settings from {:?}", fp);
            let file = std::fs::File::open(fp).context("Opening settings file")?;
            Ok(serde_yaml::from_reader(file).context("Parsing settings file")?)
        } else {
            log::info!("Creating default settings file {:?}", fp);
            let settings = Settings::default();
            let file = std::fs::File::create(fp).context("Creating settings file")?;
            serde_yaml::to_writer(file, &settings).context("Serializing settings")?;
            Ok(settings)
        }
    }

    fn get_save_dir(&self, save_name: &str) -> PathBuf {
        let mut res = self.save_root.clone();
        res.push(save_name);
        res
    }

    pub fn save_world(&self, save_name: &str, meta: &WorldMeta, voxels: &VoxelData) -> Result<()> {
        let save_dir = self.get_save_dir(save_name);
        if !save_dir.is_dir() {
            log::info!("Creating save directory at {}", save_dir.to_string_lossy());
            std::fs::create_dir_all(&save_dir).context("Creating save directory")?;
        } else {
            log::info!(
                "Overwriting existing save at {}",
                save_dir.to_string_lossy()
            );
        }

        {
            let file_path = save_dir.join(WORLD_META_FILE_NAME);
            let file = std::fs::File::create(&file_path)
                .context("Creating world meta file for saved world")?;
            serde_yaml::to_writer(file, meta).context("Writing world meta file for saved world")?;
        }

        {
            let file_path = save_dir.join(VOXEL_DATA_FILE_NAME);
            let file = std::fs::File::create(&file_path)
                .context("Creating voxel data file for saved world")?;
            let mut encoder = lz4::EncoderBuilder::new()
                .build(file)
                .context("Initializing encoder for voxel data file")?;
            let bytes = voxels
                .serialize_voxels(&mut encoder)
                .context("Writing out voxel data for saved world")?;
            let (_file, res) = encoder.finish();
            res.context("Finishing voxel data file")?;
            log::info!("Wrote {} bytes of voxel data to {:?}", bytes, file_path);
        }

        Ok(())
    }

    pub fn load_world(&self, save_name: &str) -> Result<(WorldMeta, VoxelData)> {
        let save_dir = self.get_save_dir(save_name);
        if !save_dir.is_dir() {
            return Err(anyhow!(
                "Saved world {} does not exist: expected {} to be a directory",
                save_name,
                save_dir.to_string_lossy()
            ));
        }

        let meta_path = save_dir.join(WORLD_META_FILE_NAME);
        let data_path = save_dir.join(VOXEL_DATA_FILE_NAME);
        for path in &[&meta_path, &data_path] {
            if !path.is_file() {
                return Err(anyhow!(
                    "Saved world {} is incomplete: expected {} to be a file",
                    save_name,
                    path.to_string_lossy()
                ));
            }
        }

        log::info!("Loading world metadata from {:?}", meta_path);
        let meta_file = std::fs::File::open(&meta_path)
            .context("Opening world meta file for saved world")?;
        let meta = Self::load_world_meta(meta_file)?;

        log::info!("Loading voxels from {:?}", data_path);
        let voxels = Self::load_voxel_data(&data_path)?;

        let stored = voxels.columns();
        if let Some(missing) = meta.columns.iter().find(|column| !stored.contains(*column)) {
            log::warn!(
                "Column {} listed in world meta has no voxel data; it will read as unloaded",
                missing
            );
        }

        Ok((meta, voxels))
    }

    pub fn load_world_meta<R: std::io::Read>(file: R) -> Result<WorldMeta> {
        Ok(serde_yaml::from_reader(file).context("Parsing world meta file for saved world")?)
    }

    fn load_voxel_data(path: &Path) -> Result<VoxelData> {
        let file =
            std::fs::File::open(path).context("Opening voxel data file for saved world")?;
        let mut decompressed =
            lz4::Decoder::new(file).context("Initializing decoder for voxel data file")?;

        let mut voxels = VoxelData::new();
        voxels
            .deserialize_voxels(&mut decompressed)
            .context("Deserializing voxel data")?;
        Ok(voxels)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;
    use voxray_voxels::{Block, Voxel, VoxelIndexMut};

    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let mut root = std::env::temp_dir();
        root.push(format!("voxray-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn test_settings_created() {
        let root = scratch_root("settings");
        let ctx = FileContext::new(root.clone());
        std::fs::create_dir_all(&root).unwrap();

        assert!(!ctx.settings_path.is_file());
        let settings = ctx.load_settings().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(ctx.settings_path.is_file());
        assert_eq!(ctx.load_settings().unwrap(), settings);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_save_and_load() {
        let root = scratch_root("save");
        let ctx = FileContext::new(root.clone());
        ctx.ensure_directories().unwrap();

        let column = ChunkColumn::new(-1, 2);
        let mut voxels = VoxelData::new();
        voxels.load_column(column, 0..32);
        voxels.set(
            Voxel::encode(Block::FENCE.id(), 3),
            Point3::new(-16, 5, 33),
        );
        let meta = WorldMeta {
            origin: Point3::new(0, 0, 0),
            columns: vec![column],
            finalized: false,
        };

        ctx.save_world("test", &meta, &voxels).unwrap();
        let (loaded_meta, loaded_voxels) = ctx.load_world("test").unwrap();
        assert_eq!(loaded_meta, meta);
        assert_eq!(loaded_voxels, voxels);

        assert!(ctx.load_world("missing").is_err());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
