//! rvdisasm - RISC-V ELF32 disassembler
//!
//! Usage:
//!   rvdisasm <input.elf> <output.txt>
//!   rvdisasm <input.elf> <output.txt> --config rvdisasm.json

use anyhow::{Context, Result};
use clap::Parser;
use rvdisasm::io::ImageReader;
use rvdisasm::{disassemble, logging, DisasmConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "rvdisasm")]
#[command(about = "Disassemble the .text section of a RISC-V ELF32 file", long_about = None)]
struct Cli {
    /// Path to the ELF file
    input: PathBuf,

    /// Path of the report to write
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat missing .text/.symtab/.strtab sections as empty
    #[arg(long)]
    lenient: bool,

    /// Only write the .text listing
    #[arg(long)]
    no_symtab: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_tracing_json();
    } else {
        logging::init_tracing();
    }

    let mut config = match &cli.config {
        Some(path) => DisasmConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DisasmConfig::default(),
    };
    if cli.lenient {
        config.sections.strict = false;
    }
    if cli.no_symtab {
        config.output.emit_symtab = false;
    }

    let image = ImageReader::new(config.io.clone())
        .load(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let report = disassemble(image.as_bytes(), &config)
        .with_context(|| format!("Failed to disassemble {}", cli.input.display()))?;

    // only create the output once there is something to put in it
    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    report
        .write_to(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        lines = report.lines().len(),
        "Report written"
    );
    Ok(())
}
