//! # Validate Subcommand
//!
//! Validates a data document against a schema literal and reports every
//! violation with its instance path.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::{read_data, read_schema, report_validation};

/// Arguments for the `classy validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema literal: a JSON/YAML file path or inline JSON.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: String,

    /// Data to validate: a JSON/YAML file path or inline JSON.
    #[arg(value_name = "DATA")]
    pub data: String,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = read_schema(&args.schema)?;
    let data = read_data(&args.data)?;

    match schema.validate(&data) {
        Ok(()) => {
            writeln!(out, "OK: {}", args.data)?;
            Ok(0)
        }
        Err(e) => report_validation(out, e),
    }
}
