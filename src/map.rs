use serde::Serialize;

use crate::blockset::BlocksetId;

/// A story flag: bit `bit` of flag byte `byte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flag {
    pub byte: u16,
    pub bit: u8,
}

impl Flag {
    pub fn new(byte: u16, bit: u8) -> Flag {
        Flag { byte, bit }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.byte, self.bit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(skip)]
    pub type_id: u8,
    pub position: Position,
    pub orientation: u8,
    pub palette: u8,
    pub speed: u8,
    pub fightable: bool,
    pub liftable: bool,
    pub can_pass_through: bool,
    pub appear_after_player_moved_away: bool,
    pub gravity_immune: bool,
    pub talkable: bool,
    pub dialogue: u8,
    pub behavior_id: u16,
    pub use_tiles_from_other_entity: bool,
    #[serde(rename = "flagUnknown_2_3")]
    pub flag_unknown_2_3: bool,
    #[serde(rename = "flagUnknown_2_4")]
    pub flag_unknown_2_4: bool,
}

/// Entity visibility tied to a global flag. Not exported yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEntityMaskFlag {
    pub flag: Flag,
    pub entity_group: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub id: u16,
    /// ROM address of the tile layout. Several maps may share one.
    pub address: u32,
    pub blockset: BlocksetId,
    pub palette_id: usize,
    pub background_music: u8,
    pub room_height: u8,
    pub base_chest_id: u8,
    pub unknown_param_1: u8,
    pub unknown_param_2: u8,
    pub climb_destination: u16,
    pub fall_destination: u16,
    pub visited_flag: Flag,
    pub entities: Vec<Entity>,

    pub variants: Vec<(u16, Flag)>,
    pub speaker_ids: Vec<u16>,
    pub global_entity_mask_flags: Vec<GlobalEntityMaskFlag>,
    pub key_door_mask_flags: Vec<GlobalEntityMaskFlag>,
}

impl Map {
    pub fn new(id: u16, address: u32) -> Map {
        Map {
            id,
            address,
            blockset: BlocksetId {
                primary: 0,
                secondary: 0,
            },
            palette_id: 0,
            background_music: 0,
            room_height: 0,
            base_chest_id: 0,
            unknown_param_1: 0,
            unknown_param_2: 0,
            climb_destination: 0xFFFF,
            fall_destination: 0xFFFF,
            visited_flag: Flag::default(),
            entities: Vec::new(),
            variants: Vec::new(),
            speaker_ids: Vec::new(),
            global_entity_mask_flags: Vec::new(),
            key_door_mask_flags: Vec::new(),
        }
    }
}

/// Decoded tile grid shared by every map pointing at the same address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapLayout {
    pub left: u8,
    pub top: u8,
    pub width: u8,
    pub foreground: Vec<u16>,
    pub background: Vec<u16>,
    pub heightmap_width: u8,
    pub heightmap: Vec<u16>,
}
