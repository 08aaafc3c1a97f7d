//! # Render Subcommand
//!
//! Prints the fully rendered JSON Schema document of a schema literal.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use classy_schema::{dump_with, Destination, Style};

use crate::read_schema;

/// Arguments for the `classy render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Schema literal: a JSON/YAML file path or inline JSON.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: String,

    /// Print on a single line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the render subcommand.
pub fn run_render(args: &RenderArgs, out: &mut dyn Write) -> Result<u8> {
    let document = read_schema(&args.schema)?.render()?;
    let style = if args.compact { Style::Compact } else { Style::Pretty };
    dump_with(&document, Destination::Writer(&mut *out), style)?;
    writeln!(out)?;
    Ok(0)
}
