use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::error::{ExtractError, Result};

const CONFIG_FILE: &str = "layout.toml";

/// Where the tables live inside the ROM. Any field left out of a config
/// file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RomLayout {
    /// Address of the long that points at the tileset table.
    pub tileset_table_pointer: u32,
    pub tileset_count: usize,
    pub tileset_sentinels: Vec<u32>,

    pub palette_table: u32,
    pub palette_count: usize,
    pub colors_per_palette: usize,

    pub blockset_group_table: u32,
    pub blockset_group_count: usize,

    pub map_table: u32,
    pub map_count: usize,
    pub map_sentinels: Vec<u32>,
}

impl Default for RomLayout {
    fn default() -> Self {
        RomLayout {
            tileset_table_pointer: 0x0000_0200,
            tileset_count: 0x20,
            tileset_sentinels: vec![0xFFFF_FFFF, 0x0009_4F2A],
            palette_table: 0x000A_0A00,
            palette_count: 0x3A,
            colors_per_palette: 13,
            blockset_group_table: 0x0004_3E90,
            blockset_group_count: 0x20,
            map_table: 0x000A_0400,
            map_count: 0x330,
            map_sentinels: vec![0xFFFF_FFFF],
        }
    }
}

impl RomLayout {
    pub fn from_toml(text: &str, path: &Path) -> Result<RomLayout> {
        toml::from_str(text).map_err(|source| ExtractError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<RomLayout> {
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        let layout = RomLayout::from_toml(&text, path)?;
        info!("Using ROM layout from {}", path.display());
        Ok(layout)
    }

    /// An explicit path wins, then the user config directory, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<RomLayout> {
        if let Some(path) = explicit {
            return RomLayout::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => RomLayout::from_file(&path),
            _ => {
                warn!(
                    "No layout config found; the default table addresses are \
                     placeholders, not real Landstalker offsets"
                );
                Ok(RomLayout::default())
            }
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE))
}
