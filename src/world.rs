use std::collections::BTreeMap;

use crate::blockset::{Blockset, BlocksetId};
use crate::map::Map;
use crate::palette::MapPalette;

/// Everything decoded from a ROM that the exporters read from.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub blockset_groups: Vec<Vec<Blockset>>,
    pub map_palettes: Vec<MapPalette>,
    pub maps: BTreeMap<u16, Map>,
    pub entity_type_names: BTreeMap<u8, String>,
}

impl World {
    pub fn blockset(&self, id: BlocksetId) -> Option<&Blockset> {
        self.blockset_groups
            .get(id.primary as usize)?
            .get(id.secondary as usize)
    }

    pub fn map_palette(&self, id: usize) -> Option<&MapPalette> {
        self.map_palettes.get(id)
    }

    pub fn entity_type_name(&self, type_id: u8) -> String {
        match self.entity_type_names.get(&type_id) {
            Some(name) => name.clone(),
            None => format!("entity_{:02x}", type_id),
        }
    }

    pub fn add_map(&mut self, map: Map) {
        self.maps.insert(map.id, map);
    }
}
