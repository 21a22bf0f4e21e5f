use crate::error::Result;
use crate::map::MapLayout;
use crate::rom::Rom;
use crate::table::PointerTable;
use crate::world::World;

/// Decoding of the game's own data structures. The exporters only go
/// through this trait, so any reader of the ROM can drive them.
pub trait WorldSource {
    fn load_world(&self, rom: &Rom) -> Result<World>;

    fn decode_map_layout(&self, rom: &Rom, address: u32) -> Result<MapLayout>;

    /// Decompresses the block starting at `address`.
    fn decompress(&self, rom: &Rom, address: u32) -> Result<Vec<u8>>;

    fn tileset_table(&self, rom: &Rom) -> Result<PointerTable>;
}
