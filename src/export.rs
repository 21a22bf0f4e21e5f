use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::layer::layer_to_csv;
use crate::map::MapLayout;
use crate::metadata::{LayoutMetadata, MapMetadata};
use crate::palette::palette_to_csv;
use crate::rom::Rom;
use crate::source::WorldSource;
use crate::span::record_spans;
use crate::table::export_table;
use crate::world::World;

pub const BLOCKSETS_DIR: &str = "blocksets";
pub const PALETTES_DIR: &str = "map_palettes";
pub const TILESETS_DIR: &str = "tilesets";
pub const MAPS_DIR: &str = "maps";

/// Counts of what one run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub blocksets: usize,
    pub palettes: usize,
    pub tilesets: usize,
    pub map_layouts: usize,
    pub maps: usize,
}

/// Runs every exporter in turn. The first failure aborts the run.
pub fn extract<S: WorldSource>(rom: &Rom, source: &S, output: &Path) -> Result<ExtractionSummary> {
    let world = source.load_world(rom)?;
    let mut summary = ExtractionSummary {
        blocksets: export_blocksets(&world, &output.join(BLOCKSETS_DIR))?,
        palettes: export_map_palettes(&world, &output.join(PALETTES_DIR))?,
        tilesets: export_tilesets(rom, source, &output.join(TILESETS_DIR))?,
        ..ExtractionSummary::default()
    };
    (summary.map_layouts, summary.maps) = export_maps(rom, source, &world, &output.join(MAPS_DIR))?;
    Ok(summary)
}

pub fn export_blocksets(world: &World, directory: &Path) -> Result<usize> {
    create_dir(directory)?;
    create_dir(&directory.join("renders"))?;

    let mut count = 0;
    for (i, group) in world.blockset_groups.iter().enumerate() {
        for (j, blockset) in group.iter().enumerate() {
            let path = directory.join(format!("blockset_{}_{}.csv", i, j));
            write_file(&path, blockset.to_csv().as_bytes())?;
            count += 1;
        }
    }
    info!("Exported {} blocksets to {}", count, directory.display());
    Ok(count)
}

pub fn export_map_palettes(world: &World, directory: &Path) -> Result<usize> {
    create_dir(directory)?;

    for (i, palette) in world.map_palettes.iter().enumerate() {
        write_file(&directory.join(format!("{}.csv", i)), palette_to_csv(palette).as_bytes())?;
    }
    info!("Exported {} map palettes to {}", world.map_palettes.len(), directory.display());
    Ok(world.map_palettes.len())
}

/// One `<slot>.bin` per used tileset slot. Skipped slots leave a gap.
pub fn export_tilesets<S: WorldSource>(rom: &Rom, source: &S, directory: &Path) -> Result<usize> {
    create_dir(directory)?;

    let table = source.tileset_table(rom)?;
    let count = export_table(
        rom,
        &table,
        |rom, address| source.decompress(rom, address),
        |index, bytes| write_file(&directory.join(format!("{}.bin", index)), &bytes),
    )?;
    info!("Exported {} tilesets to {}", count, directory.display());
    Ok(count)
}

/// One `map_layout_NNN/` bundle per distinct layout address, numbered from 1
/// in address order, holding a `map_NNN.lsmap` for every map using it.
///
/// Returns the number of layouts and of map documents written.
pub fn export_maps<S: WorldSource>(
    rom: &Rom,
    source: &S,
    world: &World,
    directory: &Path,
) -> Result<(usize, usize)> {
    create_dir(directory)?;
    if world.maps.is_empty() {
        info!("No maps to export");
        return Ok((0, 0));
    }

    let spans = record_spans(world.maps.values().map(|map| map.address))?;
    let mut total_size = 0u64;
    let mut map_count = 0;

    for (number, (&address, &span)) in (1..).zip(spans.iter()) {
        let bundle = directory.join(format!("map_layout_{}", zero_pad(number)));
        create_dir(&bundle)?;

        let layout = source.decode_map_layout(rom, address)?;
        export_map_layout(&layout, &bundle)?;
        debug!("Layout {:06X} -> {} ({} bytes)", address, bundle.display(), span);
        total_size += span as u64;

        for map in world.maps.values().filter(|map| map.address == address) {
            let metadata = MapMetadata::build(world, map)?;
            let path = bundle.join(format!("map_{}.lsmap", zero_pad(map.id as usize)));
            write_json(&path, &metadata)?;
            map_count += 1;
        }
    }

    info!(
        "Exported {} map layouts ({} bytes) and {} maps to {}",
        spans.len(),
        total_size,
        map_count,
        directory.display()
    );
    Ok((spans.len(), map_count))
}

pub fn export_map_layout(layout: &MapLayout, directory: &Path) -> Result<()> {
    let width = layout.width as usize;
    let heightmap_width = layout.heightmap_width as usize;
    write_file(
        &directory.join("foreground.csv"),
        layer_to_csv(&layout.foreground, width)?.as_bytes(),
    )?;
    write_file(
        &directory.join("background.csv"),
        layer_to_csv(&layout.background, width)?.as_bytes(),
    )?;
    write_file(
        &directory.join("heightmap.csv"),
        layer_to_csv(&layout.heightmap, heightmap_width)?.as_bytes(),
    )?;
    write_json(&directory.join("layout_metadata.json"), &LayoutMetadata::from(layout))
}

/// Decimal, padded with zeros to at least three digits.
pub fn zero_pad(id: usize) -> String {
    format!("{:03}", id)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ExtractError::io(path, e))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| ExtractError::io(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| ExtractError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ExtractError::Json {
        path: PathBuf::from(path),
        source,
    })?;
    writer.flush().map_err(|e| ExtractError::io(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
