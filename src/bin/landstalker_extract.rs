use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use landstalker_extract::{extract, Rom, RomDecoder, RomLayout};
use log::info;

#[derive(Parser)]
#[command(name = "landstalker-extract")]
#[command(about = "Extract blocksets, palettes, tilesets and maps from a Landstalker ROM")]
#[command(version)]
struct Cli {
    /// ROM image to read
    #[arg(long, default_value = "./input.md")]
    input: PathBuf,

    /// Directory receiving blocksets/, map_palettes/, tilesets/ and maps/
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// TOML file describing where the ROM tables are. The built-in table
    /// addresses are placeholders, not real Landstalker offsets
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,

    /// Log every file written
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    println!("======== Landstalker Extractor v{} ========\n", env!("CARGO_PKG_VERSION"));

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    };

    if cli.pause {
        print!("\nPress any key to exit.");
        let _ = io::stdout().flush();
        let mut dummy = String::new();
        let _ = io::stdin().lock().read_line(&mut dummy);
    }

    code
}

fn run(cli: &Cli) -> Result<()> {
    let rom = Rom::open(&cli.input).context("Failed to load ROM")?;
    let layout = RomLayout::resolve(cli.layout.as_deref()).context("Failed to load ROM layout")?;
    let decoder = RomDecoder::new(layout);

    let summary = extract(&rom, &decoder, &cli.output).context("Extraction failed")?;
    info!(
        "Done: {} blocksets, {} palettes, {} tilesets, {} map layouts, {} maps",
        summary.blocksets, summary.palettes, summary.tilesets, summary.map_layouts, summary.maps
    );
    Ok(())
}
