use anyhow::{Context, Result};
use landstalker_extract::Rom;

fn main() -> Result<()> {
    env_logger::init();
    let rom_path = std::env::args()
        .nth(1)
        .context("Usage: bin/show_header <path-to-rom>")?;
    let rom = Rom::open(&rom_path).context("Failed to read ROM file")?;

    let header = rom.header();
    println!("system:   {}", header.system);
    println!("company:  {}", header.copyright);
    println!("domestic: {}", header.domestic_title);
    println!("overseas: {}", header.overseas_title);
    println!("serial:   {}", header.serial);
    println!("range:    {:06X}-{:06X}", header.rom_start, header.rom_end);
    println!("region:   {}", header.region);
    println!("size:     {} bytes", rom.len());
    Ok(())
}
