#![allow(dead_code)]

use std::collections::BTreeMap;

use landstalker_extract::blockset::Blockset;
use landstalker_extract::map::{Map, MapLayout};
use landstalker_extract::palette::Color;
use landstalker_extract::table::PointerTable;
use landstalker_extract::world::World;
use landstalker_extract::{ExtractError, Result, Rom, WorldSource};

/// A zero-filled image with a header area, written to by offset.
pub struct RomBuilder {
    bytes: Vec<u8>,
}

impl RomBuilder {
    pub fn new(size: usize) -> RomBuilder {
        let mut bytes = vec![0u8; size];
        bytes[0x100..0x110].copy_from_slice(b"SEGA MEGA DRIVE ");
        RomBuilder { bytes }
    }

    pub fn put(&mut self, at: u32, data: &[u8]) -> &mut Self {
        let at = at as usize;
        self.bytes[at..at + data.len()].copy_from_slice(data);
        self
    }

    pub fn put_long(&mut self, at: u32, value: u32) -> &mut Self {
        self.put(at, &value.to_be_bytes())
    }

    pub fn put_words(&mut self, at: u32, words: &[u16]) -> &mut Self {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        self.put(at, &bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn build(&self) -> Rom {
        Rom::from_bytes(self.bytes.clone()).unwrap()
    }
}

/// Encodes `data` as an LZ77 stream made only of literals.
pub fn compress_literals(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut terminated = false;
    for chunk in data.chunks(8) {
        out.push((0xFF00u16 >> chunk.len()) as u8);
        out.extend_from_slice(chunk);
        if chunk.len() < 8 {
            out.extend([0x00, 0x00]);
            terminated = true;
        }
    }
    if !terminated {
        out.extend([0x00, 0x00, 0x00]);
    }
    out
}

/// Serves a prepared world and layouts, ignoring ROM contents except for
/// the tileset table.
pub struct FakeSource {
    pub world: World,
    pub layouts: BTreeMap<u32, MapLayout>,
    pub tilesets: PointerTable,
    pub tileset_data: BTreeMap<u32, Vec<u8>>,
}

impl FakeSource {
    pub fn new(world: World) -> FakeSource {
        FakeSource {
            world,
            layouts: BTreeMap::new(),
            tilesets: PointerTable::new(0x200, 0, &[]),
            tileset_data: BTreeMap::new(),
        }
    }
}

impl WorldSource for FakeSource {
    fn load_world(&self, _rom: &Rom) -> Result<World> {
        Ok(self.world.clone())
    }

    fn decode_map_layout(&self, _rom: &Rom, address: u32) -> Result<MapLayout> {
        self.layouts
            .get(&address)
            .cloned()
            .ok_or_else(|| ExtractError::Decode {
                address,
                reason: "no layout here".to_string(),
            })
    }

    fn decompress(&self, _rom: &Rom, address: u32) -> Result<Vec<u8>> {
        self.tileset_data
            .get(&address)
            .cloned()
            .ok_or_else(|| ExtractError::Decode {
                address,
                reason: "no tileset here".to_string(),
            })
    }

    fn tileset_table(&self, _rom: &Rom) -> Result<PointerTable> {
        Ok(self.tilesets.clone())
    }
}

pub fn simple_world() -> World {
    let mut world = World::default();
    world.blockset_groups = vec![vec![Blockset::default(); 2]; 2];
    world.map_palettes = vec![vec![Color::from_cram(0x0E00)]; 2];
    world
}

pub fn layout(left: u8, fill: u16) -> MapLayout {
    MapLayout {
        left,
        top: left + 1,
        width: 2,
        foreground: vec![fill; 4],
        background: vec![fill + 1; 4],
        heightmap_width: 1,
        heightmap: vec![fill + 2; 2],
    }
}

pub fn map(id: u16, address: u32, bgm: u8) -> Map {
    let mut map = Map::new(id, address);
    map.background_music = bgm;
    map
}
