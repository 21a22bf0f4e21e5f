use crate::tile::Tile;

/// A 16x16 block: top-left, top-right, bottom-left, bottom-right.
pub type Block = [Tile; 4];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blockset {
    pub blocks: Vec<Block>,
}

impl Blockset {
    pub fn new(blocks: Vec<Block>) -> Blockset {
        Blockset { blocks }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let line: Vec<String> = block.iter().map(Tile::to_csv).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlocksetId {
    pub primary: u8,
    pub secondary: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_block() {
        let blockset = Blockset::new(vec![
            [Tile::from(1), Tile::from(2), Tile::from(0x0803), Tile::from(0x9004)],
            [Tile::from(0); 4],
        ]);
        assert_eq!(blockset.to_csv(), "1,,2,,3,h,4,pv\n0,,0,,0,,0,\n");
    }
}
