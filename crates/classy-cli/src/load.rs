//! # Load Subcommand
//!
//! Loads a data document through a schema literal: validation first, then
//! projection onto the declared properties and default resolution. Prints
//! the loaded result.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use classy_schema::{dump_with, Destination, Style};

use crate::{read_data, read_schema, report_validation};

/// Arguments for the `classy load` subcommand.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Schema literal: a JSON/YAML file path or inline JSON.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: String,

    /// Data to load: a JSON/YAML file path or inline JSON.
    #[arg(value_name = "DATA")]
    pub data: String,

    /// Pretty-print the result.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the load subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_load(args: &LoadArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = read_schema(&args.schema)?;
    let data = read_data(&args.data)?;

    let loaded = match schema.load(data, true) {
        Ok(item) => item,
        Err(e) => return report_validation(out, e),
    };

    let style = if args.pretty { Style::Pretty } else { Style::Compact };
    dump_with(&loaded, Destination::Writer(&mut *out), style)?;
    writeln!(out)?;
    Ok(0)
}
