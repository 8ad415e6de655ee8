//! unasm - decode raw x86-64 machine code into assembly text.
//!
//! Usage:
//!   unasm <file>                 Decode the whole file from offset 0
//!   unasm <file> -o 0x40         Decode starting at a byte offset
//!   unasm <file> -c 10           Stop after ten instructions

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use unasm_disasm::Disassembler;

#[derive(Parser)]
#[command(name = "unasm")]
#[command(about = "Decode raw x86-64 machine code into assembly text", long_about = None)]
struct Cli {
    /// Path to a file of raw machine code
    input: PathBuf,

    /// Byte offset to start decoding at (hex accepted with an 0x prefix)
    #[arg(short, long, default_value = "0", value_parser = parse_offset)]
    offset: usize,

    /// Maximum number of lines to print
    #[arg(short, long)]
    count: Option<usize>,
}

fn parse_offset(s: &str) -> Result<usize, String> {
    if let Some(hex) = s.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    if cli.offset > data.len() {
        bail!(
            "offset {:#x} is past the end of the {}-byte input",
            cli.offset,
            data.len()
        );
    }

    let mut disasm = Disassembler::new(&data);
    let limit = cli.count.unwrap_or(usize::MAX);
    let mut offset = cli.offset;
    let mut printed = 0;

    while offset < data.len() && printed < limit {
        match disasm.decode_single(offset) {
            Ok(inst) => {
                println!("{inst}");
                offset = inst.end();
            }
            Err(err) => {
                // resynchronize one byte past the failed decode
                println!("{} 1  <decode error: {}>", offset, err);
                offset += 1;
            }
        }
        printed += 1;
    }

    Ok(())
}
