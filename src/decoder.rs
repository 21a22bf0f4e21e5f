use log::{debug, info};
use modular_bitfield::prelude::*;

use crate::blockset::{Block, Blockset, BlocksetId};
use crate::error::{ExtractError, Result};
use crate::layout::RomLayout;
use crate::lz77;
use crate::map::{Entity, Flag, Map, MapLayout, Position};
use crate::palette::{Color, MapPalette};
use crate::rom::Rom;
use crate::source::WorldSource;
use crate::table::{PointerTable, Slot};
use crate::tile::Tile;
use crate::world::World;

const ENTITY_SIZE: u32 = 8;

#[bitfield(bits = 8)]
#[derive(Debug, Clone, Copy)]
struct EntityAttributes {
    orientation: B2,
    palette: B2,
    speed: B3,
    fightable: bool,
}

#[bitfield(bits = 8)]
#[derive(Debug, Clone, Copy)]
struct EntityFlags {
    liftable: bool,
    can_pass_through: bool,
    appear_after_player_moved_away: bool,
    gravity_immune: bool,
    talkable: bool,
    use_tiles_from_other_entity: bool,
    flag_unknown_2_3: bool,
    flag_unknown_2_4: bool,
}

/// Sequential big-endian reads from a ROM position.
struct Cursor<'a> {
    rom: &'a Rom,
    pos: u32,
}

impl<'a> Cursor<'a> {
    fn new(rom: &'a Rom, pos: u32) -> Cursor<'a> {
        Cursor { rom, pos }
    }

    fn byte(&mut self) -> Result<u8> {
        let v = self.rom.get_byte(self.pos)?;
        self.pos += 1;
        Ok(v)
    }

    fn word(&mut self) -> Result<u16> {
        let v = self.rom.get_word(self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    fn long(&mut self) -> Result<u32> {
        let v = self.rom.get_long(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    fn words(&mut self, count: usize) -> Result<Vec<u16>> {
        (0..count).map(|_| self.word()).collect()
    }
}

/// Reads the game's tables straight out of the ROM, at the places a
/// [`RomLayout`] says they are.
pub struct RomDecoder {
    layout: RomLayout,
}

impl RomDecoder {
    pub fn new(layout: RomLayout) -> RomDecoder {
        RomDecoder { layout }
    }

    pub fn layout(&self) -> &RomLayout {
        &self.layout
    }

    fn read_palettes(&self, rom: &Rom) -> Result<Vec<MapPalette>> {
        let mut cursor = Cursor::new(rom, self.layout.palette_table);
        (0..self.layout.palette_count)
            .map(|_| -> Result<MapPalette> {
                let words = cursor.words(self.layout.colors_per_palette)?;
                Ok(words.into_iter().map(Color::from_cram).collect())
            })
            .collect()
    }

    fn read_blockset(&self, rom: &Rom, address: u32) -> Result<Blockset> {
        let mut cursor = Cursor::new(rom, address);
        let count = cursor.word()?;
        let mut blocks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut block: Block = [Tile::default(); 4];
            for tile in block.iter_mut() {
                *tile = Tile::from(cursor.word()?);
            }
            blocks.push(block);
        }
        Ok(Blockset::new(blocks))
    }

    fn read_blockset_groups(&self, rom: &Rom) -> Result<Vec<Vec<Blockset>>> {
        let table = PointerTable::new(
            self.layout.blockset_group_table,
            self.layout.blockset_group_count,
            &[],
        );
        // count comes from the config; entries are read one at a time so an
        // oversized table fails on the first read past the end of the ROM
        let mut groups = Vec::new();
        for index in 0..table.count {
            let group_addr = table.read_entry(rom, index)?;
            let mut cursor = Cursor::new(rom, group_addr);
            let count = cursor.byte()?;
            let mut group = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let blockset_addr = cursor.long()?;
                group.push(self.read_blockset(rom, blockset_addr)?);
            }
            groups.push(group);
        }
        Ok(groups)
    }

    fn read_map(&self, rom: &Rom, id: u16, address: u32) -> Result<Map> {
        let mut cursor = Cursor::new(rom, address);
        let mut map = Map::new(id, cursor.long()?);
        map.blockset = BlocksetId {
            primary: cursor.byte()?,
            secondary: cursor.byte()?,
        };
        map.palette_id = cursor.byte()? as usize;
        map.background_music = cursor.byte()?;
        map.room_height = cursor.byte()?;
        map.base_chest_id = cursor.byte()?;
        map.unknown_param_1 = cursor.byte()?;
        map.unknown_param_2 = cursor.byte()?;
        map.climb_destination = cursor.word()?;
        map.fall_destination = cursor.word()?;
        let flag_byte = cursor.word()?;
        let flag_bit = cursor.byte()?;
        if flag_bit > 7 {
            return Err(ExtractError::decode(
                address,
                format!("map {} visited flag bit {} out of range", id, flag_bit),
            ));
        }
        map.visited_flag = Flag::new(flag_byte, flag_bit);

        let entity_count = cursor.byte()?;
        for i in 0..entity_count as u32 {
            map.entities.push(read_entity(rom, cursor.pos + i * ENTITY_SIZE)?);
        }
        Ok(map)
    }

    fn read_maps(&self, rom: &Rom) -> Result<Vec<Map>> {
        let table = PointerTable::new(
            self.layout.map_table,
            self.layout.map_count,
            &self.layout.map_sentinels,
        );
        let mut maps = Vec::new();
        for (index, slot) in table.slots(rom)? {
            if let Slot::Decode(address) = slot {
                let id = u16::try_from(index).map_err(|_| {
                    ExtractError::InvalidInput(format!("map index {} exceeds 16 bits", index))
                })?;
                maps.push(self.read_map(rom, id, address)?);
            }
        }
        Ok(maps)
    }
}

fn read_entity(rom: &Rom, address: u32) -> Result<Entity> {
    let mut cursor = Cursor::new(rom, address);
    let position = Position {
        x: cursor.byte()?,
        y: cursor.byte()?,
        z: cursor.byte()?,
    };
    let attrs = EntityAttributes::from_bytes([cursor.byte()?]);
    let type_id = cursor.byte()?;
    let flags = EntityFlags::from_bytes([cursor.byte()?]);
    let dialogue = cursor.byte()?;
    let behavior_id = cursor.byte()? as u16;

    Ok(Entity {
        type_id,
        position,
        orientation: attrs.orientation(),
        palette: attrs.palette(),
        speed: attrs.speed(),
        fightable: attrs.fightable(),
        liftable: flags.liftable(),
        can_pass_through: flags.can_pass_through(),
        appear_after_player_moved_away: flags.appear_after_player_moved_away(),
        gravity_immune: flags.gravity_immune(),
        talkable: flags.talkable(),
        dialogue,
        behavior_id,
        use_tiles_from_other_entity: flags.use_tiles_from_other_entity(),
        flag_unknown_2_3: flags.flag_unknown_2_3(),
        flag_unknown_2_4: flags.flag_unknown_2_4(),
    })
}

impl WorldSource for RomDecoder {
    fn load_world(&self, rom: &Rom) -> Result<World> {
        let mut world = World {
            blockset_groups: self.read_blockset_groups(rom)?,
            map_palettes: self.read_palettes(rom)?,
            ..World::default()
        };
        for map in self.read_maps(rom)? {
            world.add_map(map);
        }
        info!(
            "Decoded {} blockset groups, {} palettes, {} maps",
            world.blockset_groups.len(),
            world.map_palettes.len(),
            world.maps.len()
        );
        Ok(world)
    }

    fn decode_map_layout(&self, rom: &Rom, address: u32) -> Result<MapLayout> {
        let mut cursor = Cursor::new(rom, address);
        let left = cursor.byte()?;
        let top = cursor.byte()?;
        let width = cursor.byte()?;
        let height = cursor.byte()?;
        let heightmap_width = cursor.byte()?;
        let heightmap_height = cursor.byte()?;
        if width == 0 || heightmap_width == 0 {
            return Err(ExtractError::decode(address, "map layout has zero width"));
        }

        let tiles = width as usize * height as usize;
        let foreground = cursor.words(tiles)?;
        let background = cursor.words(tiles)?;
        let heightmap = cursor.words(heightmap_width as usize * heightmap_height as usize)?;
        debug!(
            "Layout {:06X}: {}x{} tiles, {}x{} heightmap",
            address, width, height, heightmap_width, heightmap_height
        );

        Ok(MapLayout {
            left,
            top,
            width,
            foreground,
            background,
            heightmap_width,
            heightmap,
        })
    }

    fn decompress(&self, rom: &Rom, address: u32) -> Result<Vec<u8>> {
        lz77::decode(rom.bytes_from(address)?, address)
    }

    fn tileset_table(&self, rom: &Rom) -> Result<PointerTable> {
        let base = rom.get_long(self.layout.tileset_table_pointer)?;
        Ok(PointerTable::new(
            base,
            self.layout.tileset_count,
            &self.layout.tileset_sentinels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> RomDecoder {
        RomDecoder::new(RomLayout {
            tileset_table_pointer: 0x200,
            tileset_count: 2,
            palette_table: 0x300,
            palette_count: 2,
            colors_per_palette: 2,
            blockset_group_table: 0x400,
            blockset_group_count: 1,
            map_table: 0x500,
            map_count: 3,
            ..RomLayout::default()
        })
    }

    fn put(bytes: &mut [u8], at: usize, data: &[u8]) {
        bytes[at..at + data.len()].copy_from_slice(data);
    }

    fn rom() -> Rom {
        let mut b = vec![0u8; 0x800];
        // tileset table pointer -> 0x210, one slot used
        put(&mut b, 0x200, &0x210u32.to_be_bytes());
        put(&mut b, 0x210, &0x220u32.to_be_bytes());
        put(&mut b, 0x214, &0xFFFF_FFFFu32.to_be_bytes());
        put(&mut b, 0x220, &[0b1100_0000, 0xAB, 0xCD, 0x00, 0x00]);
        // palettes
        put(&mut b, 0x300, &[0x00, 0x00, 0x0E, 0xEE, 0x00, 0x0E, 0x0E, 0x00]);
        // one blockset group with one blockset of one block
        put(&mut b, 0x400, &0x410u32.to_be_bytes());
        put(&mut b, 0x410, &[1]);
        put(&mut b, 0x411, &0x420u32.to_be_bytes());
        put(&mut b, 0x420, &[0x00, 0x01, 0x00, 0x01, 0x08, 0x02, 0x90, 0x03, 0x00, 0x04]);
        // maps 0 and 2, slot 1 unused
        put(&mut b, 0x500, &0x600u32.to_be_bytes());
        put(&mut b, 0x504, &0xFFFF_FFFFu32.to_be_bytes());
        put(&mut b, 0x508, &0x600u32.to_be_bytes());
        put(
            &mut b,
            0x600,
            &[
                0x00, 0x00, 0x07, 0x00, // layout
                0x00, 0x00, // blockset 0/0
                0x01, // palette
                0x11, 0x22, 0x33, 0x44, 0x55, // bgm, height, chest, unknowns
                0x00, 0x2A, 0xFF, 0xFF, // climb, fall
                0x01, 0x02, 0x05, // flag 258:5
                0x01, // one entity
                0x10, 0x11, 0x02, 0b1_101_10_01, 0x6A, 0b0001_0011, 0x09, 0x42,
            ],
        );
        // layout: 2x1 tiles, 1x2 heightmap
        put(
            &mut b,
            0x700,
            &[12, 13, 2, 1, 1, 2, 0, 1, 0, 2, 0, 3, 0, 4, 0x40, 0x00, 0x01, 0x23],
        );
        Rom::from_bytes(b).unwrap()
    }

    #[test]
    fn decodes_world_tables() {
        let world = decoder().load_world(&rom()).unwrap();

        assert_eq!(world.map_palettes.len(), 2);
        assert_eq!(world.map_palettes[0][1].to_argb_hex(), "#ffeeeeee");
        assert_eq!(world.map_palettes[1][0].to_argb_hex(), "#ffee0000");

        assert_eq!(world.blockset_groups.len(), 1);
        assert_eq!(
            world.blockset_groups[0][0].to_csv(),
            "1,,2,h,3,pv,4,\n"
        );

        assert_eq!(world.maps.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        let map = &world.maps[&2];
        assert_eq!(map.address, 0x700);
        assert_eq!(map.palette_id, 1);
        assert_eq!(map.background_music, 0x11);
        assert_eq!(map.room_height, 0x22);
        assert_eq!(map.base_chest_id, 0x33);
        assert_eq!(map.unknown_param_1, 0x44);
        assert_eq!(map.unknown_param_2, 0x55);
        assert_eq!(map.climb_destination, 0x2A);
        assert_eq!(map.fall_destination, 0xFFFF);
        assert_eq!(map.visited_flag.to_string(), "258:5");
    }

    #[test]
    fn decodes_entity_bitfields() {
        let world = decoder().load_world(&rom()).unwrap();
        let entity = &world.maps[&0].entities[0];
        assert_eq!(entity.position, Position { x: 0x10, y: 0x11, z: 0x02 });
        assert_eq!(entity.orientation, 1);
        assert_eq!(entity.palette, 2);
        assert_eq!(entity.speed, 5);
        assert!(entity.fightable);
        assert_eq!(entity.type_id, 0x6A);
        assert!(entity.liftable);
        assert!(entity.can_pass_through);
        assert!(!entity.gravity_immune);
        assert!(entity.talkable);
        assert_eq!(entity.dialogue, 9);
        assert_eq!(entity.behavior_id, 0x42);
    }

    #[test]
    fn decodes_layout() {
        let layout = decoder().decode_map_layout(&rom(), 0x700).unwrap();
        assert_eq!((layout.left, layout.top), (12, 13));
        assert_eq!(layout.width, 2);
        assert_eq!(layout.foreground, vec![1, 2]);
        assert_eq!(layout.background, vec![3, 4]);
        assert_eq!(layout.heightmap_width, 1);
        assert_eq!(layout.heightmap, vec![0x4000, 0x0123]);
    }

    #[test]
    fn zero_width_layout_is_a_decode_error() {
        assert!(matches!(
            decoder().decode_map_layout(&rom(), 0x7F0),
            Err(ExtractError::Decode { address: 0x7F0, .. })
        ));
    }

    #[test]
    fn tileset_table_follows_pointer() {
        let decoder = decoder();
        let rom = rom();
        let table = decoder.tileset_table(&rom).unwrap();
        assert_eq!(table.base, 0x210);
        assert_eq!(
            table.slots(&rom).unwrap(),
            vec![(0, Slot::Decode(0x220)), (1, Slot::Skip)]
        );
        assert_eq!(decoder.decompress(&rom, 0x220).unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn oversized_table_counts_fail_with_out_of_range() {
        let layout = RomLayout::from_toml(
            "blockset_group_table = 0x400\nblockset_group_count = 9000000000000000000\n",
            std::path::Path::new("layout.toml"),
        )
        .unwrap();
        let result = RomDecoder::new(layout).load_world(&rom());
        assert!(matches!(result, Err(ExtractError::OutOfRange { .. })));

        let layout = RomLayout {
            map_count: usize::MAX,
            ..decoder().layout().clone()
        };
        let result = RomDecoder::new(layout).load_world(&rom());
        assert!(matches!(result, Err(ExtractError::OutOfRange { .. })));
    }
}
