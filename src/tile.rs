use modular_bitfield::prelude::*;

/// A VDP name-table word: which 8x8 tile to draw and how.
#[bitfield(bits = 16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub index: B11,
    pub hflip: bool,
    pub vflip: bool,
    pub palette: B2,
    pub priority: bool,
}

impl From<u16> for Tile {
    fn from(word: u16) -> Tile {
        Tile::from_bytes(word.to_le_bytes())
    }
}

impl Tile {
    pub fn word(&self) -> u16 {
        u16::from_le_bytes(self.into_bytes())
    }

    pub fn to_csv(&self) -> String {
        let mut flags = String::new();
        if self.priority() {
            flags.push('p');
        }
        if self.hflip() {
            flags.push('h');
        }
        if self.vflip() {
            flags.push('v');
        }
        format!("{},{}", self.index(), flags)
    }
}
