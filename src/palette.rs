use modular_bitfield::prelude::*;

#[bitfield(bits = 16)]
#[derive(Debug, Clone, Copy)]
struct CramWord {
    red: B4,
    green: B4,
    blue: B4,
    #[skip]
    __: B4,
}

/// An RGB color. Only the high nibble of each channel is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    pub fn from_cram(word: u16) -> Color {
        let cram = CramWord::from_bytes(word.to_le_bytes());
        Color {
            r: cram.red() << 4,
            g: cram.green() << 4,
            b: cram.blue() << 4,
        }
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn g(&self) -> u8 {
        self.g
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    /// `#ffRRGGBB` with every 4-bit channel upscaled to a full byte.
    pub fn to_argb_hex(&self) -> String {
        format!(
            "#ff{:02x}{:02x}{:02x}",
            expand_nibble(self.r >> 4),
            expand_nibble(self.g >> 4),
            expand_nibble(self.b >> 4)
        )
    }
}

pub fn expand_nibble(c: u8) -> u8 {
    (c & 0x0F) << 4 | (c & 0x0F)
}

pub type MapPalette = Vec<Color>;

pub fn palette_to_csv(palette: &[Color]) -> String {
    let mut out = String::new();
    for color in palette {
        out.push_str(&color.to_argb_hex());
        out.push('\n');
    }
    out
}
