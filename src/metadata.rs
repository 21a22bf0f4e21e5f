use log::debug;
use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::map::{Entity, Map, MapLayout};
use crate::world::World;

/// Map fields the document format cannot express yet. They are left out of
/// every exported document rather than written with made-up values.
pub const UNSUPPORTED_MAP_FIELDS: &[&str] = &[
    "variants",
    "speaker_ids",
    "global_entity_mask_flags",
    "key_door_mask_flags",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutMetadata {
    pub tilemap_offset_x: u8,
    pub tilemap_offset_y: u8,
}

impl From<&MapLayout> for LayoutMetadata {
    fn from(layout: &MapLayout) -> Self {
        LayoutMetadata {
            tilemap_offset_x: layout.left,
            tilemap_offset_y: layout.top,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDocument<'a> {
    #[serde(flatten)]
    pub entity: &'a Entity,
    pub entity_type: String,
    pub entity_type_id: u8,
}

/// Contents of a `map_NNN.lsmap` file.
#[derive(Debug, Clone, Serialize)]
pub struct MapMetadata<'a> {
    pub blockset_primary: u8,
    pub blockset_secondary: u8,
    pub palette_id: usize,
    pub bgm: u8,
    pub ceiling_height: u8,
    pub base_chest_id: u8,
    pub unknown_param_1: u8,
    pub unknown_param_2: u8,
    pub climb_destination: u16,
    pub fall_destination: u16,
    pub flag_on_visit: String,
    pub entities: Vec<EntityDocument<'a>>,
}

impl<'a> MapMetadata<'a> {
    /// Fails if the map points at a blockset or palette the world lacks.
    pub fn build(world: &'a World, map: &'a Map) -> Result<MapMetadata<'a>> {
        if world.blockset(map.blockset).is_none() {
            return Err(ExtractError::InvalidInput(format!(
                "map {} references missing blockset {}_{}",
                map.id, map.blockset.primary, map.blockset.secondary
            )));
        }
        if world.map_palette(map.palette_id).is_none() {
            return Err(ExtractError::InvalidInput(format!(
                "map {} references missing palette {}",
                map.id, map.palette_id
            )));
        }

        for field in unsupported_fields_present(map) {
            debug!("Map {}: '{}' is not exported", map.id, field);
        }

        let entities = map
            .entities
            .iter()
            .map(|entity| EntityDocument {
                entity,
                entity_type: world.entity_type_name(entity.type_id),
                entity_type_id: entity.type_id,
            })
            .collect();

        Ok(MapMetadata {
            blockset_primary: map.blockset.primary,
            blockset_secondary: map.blockset.secondary,
            palette_id: map.palette_id,
            bgm: map.background_music,
            ceiling_height: map.room_height,
            base_chest_id: map.base_chest_id,
            unknown_param_1: map.unknown_param_1,
            unknown_param_2: map.unknown_param_2,
            climb_destination: map.climb_destination,
            fall_destination: map.fall_destination,
            flag_on_visit: map.visited_flag.to_string(),
            entities,
        })
    }
}

fn unsupported_fields_present(map: &Map) -> Vec<&'static str> {
    let present = [
        !map.variants.is_empty(),
        !map.speaker_ids.is_empty(),
        !map.global_entity_mask_flags.is_empty(),
        !map.key_door_mask_flags.is_empty(),
    ];
    UNSUPPORTED_MAP_FIELDS
        .iter()
        .zip(present)
        .filter_map(|(name, set)| set.then_some(*name))
        .collect()
}
