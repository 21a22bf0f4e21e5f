//! LZ77 decompression for tileset data.
//!
//! A stream is a series of groups: one control byte followed by up to eight
//! items, read from the control's most significant bit down. A set bit is a
//! literal byte. A clear bit is a two-byte back-reference `b0 b1`:
//!
//! ```text
//! offset = (b0 & 0xF0) << 4 | b1     (0 terminates the stream)
//! length = (b0 & 0x0F) + 3
//! ```
//!
//! The copy starts `offset` bytes before the end of the output and may
//! overlap the bytes it produces.

use crate::error::{ExtractError, Result};

const MIN_MATCH: usize = 3;

pub fn decode(data: &[u8], address: u32) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    let mut pos = 0usize;

    let next = |pos: &mut usize| -> Result<u8> {
        let byte = data
            .get(*pos)
            .copied()
            .ok_or_else(|| ExtractError::decode(address, "stream ends before terminator"))?;
        *pos += 1;
        Ok(byte)
    };

    loop {
        let control = next(&mut pos)?;
        for bit in (0..8).rev() {
            if control & (1 << bit) != 0 {
                out.push(next(&mut pos)?);
                continue;
            }

            let b0 = next(&mut pos)? as usize;
            let b1 = next(&mut pos)? as usize;
            let offset = (b0 & 0xF0) << 4 | b1;
            if offset == 0 {
                return Ok(out);
            }
            if offset > out.len() {
                return Err(ExtractError::decode(
                    address,
                    format!(
                        "back-reference {} bytes behind output of {} bytes",
                        offset,
                        out.len()
                    ),
                ));
            }

            let start = out.len() - offset;
            for i in 0..(b0 & 0x0F) + MIN_MATCH {
                let byte = out[start + i];
                out.push(byte);
            }
        }
    }
}
