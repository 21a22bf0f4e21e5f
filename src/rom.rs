use std::path::Path;

use log::info;

use crate::error::{ExtractError, Result};

const HEADER_END: usize = 0x200;

pub struct Rom {
    header: Header,
    bytes: Vec<u8>,
}

impl Rom {
    pub fn open(path: impl AsRef<Path>) -> Result<Rom> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
        info!("Loaded {} ({} bytes)", path.display(), bytes.len());
        Rom::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Rom> {
        if bytes.len() < HEADER_END {
            return Err(ExtractError::Rom(format!(
                "image is {} bytes, too small to hold a header",
                bytes.len()
            )));
        }

        let header = parse_header(&bytes);
        info!("ROM system: {}", header.system);
        info!("ROM copyright: {}", header.copyright);
        info!("ROM title (domestic): {}", header.domestic_title);
        info!("ROM title (overseas): {}", header.overseas_title);
        info!("ROM serial: {}", header.serial);
        info!("ROM range: {:06X}-{:06X}", header.rom_start, header.rom_end);
        info!("Region: {}", header.region);
        info!("Checksum: {:04X}", header.checksum);

        Ok(Rom { header, bytes })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get_byte(&self, offset: u32) -> Result<u8> {
        Ok(self.read(offset, 1)?[0])
    }

    pub fn get_word(&self, offset: u32) -> Result<u16> {
        let b = self.read(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn get_long(&self, offset: u32) -> Result<u32> {
        let b = self.read(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Everything from `offset` to the end of the image, for streaming decoders.
    pub fn bytes_from(&self, offset: u32) -> Result<&[u8]> {
        let start = offset as usize;
        if start > self.bytes.len() {
            return Err(self.out_of_range(start, 0));
        }
        Ok(&self.bytes[start..])
    }

    pub fn compute_checksum(&self) -> u16 {
        let mut sum: u16 = 0;
        for pair in self.bytes[HEADER_END..].chunks(2) {
            let hi = pair[0] as u16;
            let lo = pair.get(1).copied().unwrap_or(0) as u16;
            sum = sum.wrapping_add(hi << 8 | lo);
        }
        sum
    }

    pub fn checksum_ok(&self) -> bool {
        self.compute_checksum() == self.header.checksum
    }

    fn read(&self, offset: u32, len: usize) -> Result<&[u8]> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(&self.bytes[start..end]),
            _ => Err(self.out_of_range(start, len)),
        }
    }

    fn out_of_range(&self, offset: usize, len: usize) -> ExtractError {
        ExtractError::OutOfRange {
            offset,
            len,
            size: self.bytes.len(),
        }
    }
}

fn parse_header(bytes: &[u8]) -> Header {
    let text = |start: usize, len: usize| match std::str::from_utf8(&bytes[start..start + len]) {
        Ok(s) => s.trim().to_string(),
        Err(_) => "Invalid Text".to_string(),
    };
    let long = |start: usize| u32::from_be_bytes(bytes[start..start + 4].try_into().unwrap_or([0; 4]));

    Header {
        system: text(0x100, 16),
        copyright: text(0x110, 16),
        domestic_title: text(0x120, 48),
        overseas_title: text(0x150, 48),
        serial: text(0x180, 14),
        checksum: u16::from_be_bytes([bytes[0x18E], bytes[0x18F]]),
        rom_start: long(0x1A0),
        rom_end: long(0x1A4),
        region: text(0x1F0, 3),
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub system: String,
    pub copyright: String,
    pub domestic_title: String,
    pub overseas_title: String,
    pub serial: String,
    pub checksum: u16,
    pub rom_start: u32,
    pub rom_end: u32,
    pub region: String,
}
