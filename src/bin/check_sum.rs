use anyhow::{Context, Result};
use landstalker_extract::Rom;

fn main() -> Result<()> {
    env_logger::init();
    let rom_path = std::env::args()
        .nth(1)
        .context("Usage: bin/check_sum <path-to-rom>")?;
    let rom = Rom::open(&rom_path).context("Failed to read ROM file")?;

    let calc_checksum = rom.compute_checksum();
    println!("calc_checksum:   {:016b} ({:04X})", calc_checksum, calc_checksum);
    println!("header_checksum: {:016b} ({:04X})", rom.header().checksum, rom.header().checksum);
    println!("{}", if rom.checksum_ok() { "OK" } else { "MISMATCH" });
    Ok(())
}
