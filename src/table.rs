use log::debug;

use crate::error::{ExtractError, Result};
use crate::rom::Rom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Skip,
    Decode(u32),
}

/// A fixed-size array of pointers embedded in the ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTable {
    pub base: u32,
    pub count: usize,
    pub entry_width: u32,
    pub sentinels: Vec<u32>,
}

impl PointerTable {
    pub fn new(base: u32, count: usize, sentinels: &[u32]) -> PointerTable {
        PointerTable {
            base,
            count,
            entry_width: 4,
            sentinels: sentinels.to_vec(),
        }
    }

    pub fn classify(&self, value: u32) -> Slot {
        if self.sentinels.contains(&value) {
            Slot::Skip
        } else {
            Slot::Decode(value)
        }
    }

    pub fn entry_address(&self, index: usize) -> Result<u32> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.entry_width))
            .and_then(|offset| self.base.checked_add(offset))
            .ok_or_else(|| {
                ExtractError::InvalidInput(format!(
                    "table entry {} at base {:#08x} overflows the address space",
                    index, self.base
                ))
            })
    }

    pub fn read_entry(&self, rom: &Rom, index: usize) -> Result<u32> {
        let addr = self.entry_address(index)?;
        match self.entry_width {
            1 => rom.get_byte(addr).map(u32::from),
            2 => rom.get_word(addr).map(u32::from),
            4 => rom.get_long(addr),
            width => Err(ExtractError::InvalidInput(format!(
                "unsupported table entry width {}",
                width
            ))),
        }
    }

    /// Classifies every slot, keeping the slot index.
    pub fn slots(&self, rom: &Rom) -> Result<Vec<(usize, Slot)>> {
        (0..self.count)
            .map(|i| -> Result<(usize, Slot)> {
                Ok((i, self.classify(self.read_entry(rom, i)?)))
            })
            .collect()
    }
}

/// Walks `table`, decoding and exporting every non-sentinel slot.
///
/// `export` receives the original slot index, so skipped slots leave gaps.
/// Returns the number of exported entries.
pub fn export_table<T, D, E>(
    rom: &Rom,
    table: &PointerTable,
    mut decode: D,
    mut export: E,
) -> Result<usize>
where
    D: FnMut(&Rom, u32) -> Result<T>,
    E: FnMut(usize, T) -> Result<()>,
{
    let mut exported = 0;
    for (index, slot) in table.slots(rom)? {
        match slot {
            Slot::Skip => debug!("Skipping slot {} of table {:06X}", index, table.base),
            Slot::Decode(value) => {
                let asset = decode(rom, value)?;
                export(index, asset)?;
                exported += 1;
            }
        }
    }
    Ok(exported)
}
