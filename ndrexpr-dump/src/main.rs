use std::path::PathBuf;

use clap::Parser as ClapParser;
use log::{error, info};
use ndrexpr::prelude::*;

mod config;
mod dump;
mod error;
mod logger;

use crate::{
    config::DumpConfig,
    error::{DumpError, DumpResult},
};

/// Parse a decimal or `0x`-prefixed hexadecimal address.
fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}

#[derive(ClapParser)]
#[command(name = "ndrexpr-dump")]
#[command(about = "Decode the correlation expressions of a raw format-string image")]
pub struct Arguments {
    /// Path to the raw image
    input: PathBuf,

    /// Address at which the first byte of the image is mapped
    #[arg(long, default_value = "0", value_parser = parse_address)]
    base: u64,

    /// Address of the expression offset table
    #[arg(long, value_parser = parse_address)]
    table: Option<u64>,

    /// Address of the shared expression buffer
    #[arg(long, value_parser = parse_address)]
    buffer: Option<u64>,

    /// Resolve a single slot of the offset table
    #[arg(long, conflicts_with = "count")]
    slot: Option<i64>,

    /// Resolve slots `0..count` of the offset table
    #[arg(long, default_value_t = 1)]
    count: i64,

    /// Decode one expression at this address instead of going through the offset table
    #[arg(long, value_parser = parse_address, conflicts_with_all = ["table", "slot"])]
    at: Option<u64>,

    /// Override the maximum nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Arguments) -> DumpResult<()> {
    let mut decoder = DumpConfig::resolve(args.config.as_deref())?.decoder;
    if let Some(max_depth) = args.max_depth {
        decoder = decoder.with_max_depth(max_depth);
    }

    let bytes = std::fs::read(&args.input).map_err(|e| DumpError::IoError {
        source: e,
        path: args.input.display().to_string(),
    })?;
    info!(
        "Loaded {} bytes from {}, mapped at {:#x}",
        bytes.len(),
        args.input.display(),
        args.base
    );
    let image = BasedSlice::new(args.base, &bytes);

    if let Some(address) = args.at {
        let node = parse_expression_at(&image, address, &decoder)?;
        print!("{:#x}:\n{}", address, dump::render(&node));
        return Ok(());
    }

    let Some(table_address) = args.table else {
        return Err(DumpError::InvalidArguments(
            "either --at or --table must be given".to_string(),
        ));
    };
    let table = ExprTable::new(&image, Some(table_address), args.buffer);
    if args.buffer.is_none() {
        info!("No expression buffer given, every slot resolves to an absent expression");
    }

    let indices = match args.slot {
        Some(slot) => slot..slot.saturating_add(1),
        None => 0..args.count,
    };
    for index in indices {
        let node = resolve_expression(&table, index, &decoder)?;
        print!("slot {index}:\n{}", dump::render(&node));
    }

    Ok(())
}

fn main() {
    let args = Arguments::parse();
    logger::init(logger::level_from_verbosity(args.verbose));

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
