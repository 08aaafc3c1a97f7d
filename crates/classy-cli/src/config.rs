//! # Versioned Configuration
//!
//! The CLI's own configuration file, loaded through a discriminator on its
//! `version` field:
//!
//! - `v1`: `{"version": "v1", "name": ...}`; no logging section.
//! - `v2`: adds a `logging` section whose `loglevel` defaults to `info`
//!   and whose `format` is `text` or `json`. A missing `logging` section is
//!   filled with the section defaults.
//!
//! ```yaml
//! version: v2
//! name: local
//! logging:
//!   loglevel: DEBUG
//!   format: json
//! ```
//!
//! The logging hook lower-cases `loglevel` and rejects unknown levels.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;

use classy_core::ClassyError;
use classy_schema::{
    dump_with, load, ClassDef, Destination, Discriminator, Input, Instance, Item, Schema, Select,
    Style,
};

use crate::report_validation;

/// Levels accepted by `logging.loglevel`, after lower-casing.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn logging_schema() -> Result<Schema, ClassyError> {
    Ok(Schema::object()
        .property("loglevel", Schema::string().default(json!("info")))
        .property(
            "format",
            Schema::string()
                .default(json!("text"))
                .keyword("enum", json!(["text", "json"])),
        )
        .keyword("additionalProperties", json!(false))
        .default_class(&CONFIG_LOGGING))
}

fn normalize_loglevel(instance: &mut Instance) -> Result<(), ClassyError> {
    let Some(obj) = instance.as_object_mut() else {
        return Ok(());
    };
    let level = obj.attr_mut("loglevel")?;
    let lowered = level.as_str().map(str::to_lowercase).unwrap_or_default();
    if !LOG_LEVELS.contains(&lowered.as_str()) {
        return Err(ClassyError::Hook {
            class: CONFIG_LOGGING.name().to_string(),
            reason: format!(
                "unknown loglevel {}, expected one of {LOG_LEVELS:?}",
                level.to_value()
            ),
        });
    }
    *level = Item::from(lowered);
    Ok(())
}

/// The `logging` section of a v2 configuration.
pub static CONFIG_LOGGING: ClassDef =
    ClassDef::object_with_hook("ConfigLogging", logging_schema, normalize_loglevel);

fn v1_schema() -> Result<Schema, ClassyError> {
    Ok(Schema::object()
        .property("version", Schema::string())
        .property("name", Schema::string())
        .required(["version"]))
}

/// Version 1 configuration.
pub static CONFIG_V1: ClassDef = ClassDef::object("ConfigV1", v1_schema);

fn v2_schema() -> Result<Schema, ClassyError> {
    Ok(Schema::object()
        .property("version", Schema::string())
        .property("name", Schema::string())
        .property("logging", &CONFIG_LOGGING)
        .required(["version"]))
}

/// Version 2 configuration.
pub static CONFIG_V2: ClassDef = ClassDef::object("ConfigV2", v2_schema);

/// The discriminator selecting a configuration class by `version`.
pub fn config_discriminator() -> Discriminator {
    Discriminator::new("version")
        .variant("v1", &CONFIG_V1)
        .variant("v2", &CONFIG_V2)
}

/// Load a configuration file of any known version.
pub fn load_config(path: &Path) -> Result<Instance, ClassyError> {
    let discriminator = config_discriminator();
    load(Input::Path(path), Select::Discriminator(&discriminator))?.into_instance()
}

/// Logging settings carried by a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Lower-cased level name, usable as an `EnvFilter` directive.
    pub level: String,
    /// Emit JSON log lines instead of text.
    pub json: bool,
}

impl LogSettings {
    /// The logging settings of `config`, if it has a logging section.
    pub fn from_config(config: &Instance) -> Option<Self> {
        let logging = config.attr("logging").ok()?;
        let level = logging.get("loglevel")?.as_str()?.to_string();
        let json = logging.get("format").and_then(Item::as_str) == Some("json");
        Some(Self { level, json })
    }
}

/// Arguments for the `classy config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file. Defaults to the global `--config` path.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Pretty-print the loaded configuration.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the config subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_config(
    args: &ConfigArgs,
    fallback: Option<&Path>,
    out: &mut dyn Write,
) -> Result<u8> {
    let Some(path) = args.file.as_deref().or(fallback) else {
        bail!("no configuration file given; pass FILE or --config");
    };

    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => return report_validation(out, e),
    };
    tracing::info!(
        path = %path.display(),
        class = config.class().name(),
        "loaded configuration"
    );

    let style = if args.pretty { Style::Pretty } else { Style::Compact };
    dump_with(&config, Destination::Writer(&mut *out), style)?;
    writeln!(out)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_v1_has_no_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "c.json", r#"{"version": "v1", "name": "a"}"#);
        let config = load_config(&path).unwrap();
        assert_eq!(config.class().name(), "ConfigV1");
        assert!(LogSettings::from_config(&config).is_none());
    }

    #[test]
    fn test_v2_fills_logging_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "c.yaml", "version: v2\nname: local\n");
        let config = load_config(&path).unwrap();
        let logging = config.attr("logging").unwrap();
        assert_eq!(logging.as_object().unwrap().class().name(), "ConfigLogging");
        assert_eq!(
            LogSettings::from_config(&config),
            Some(LogSettings {
                level: "info".to_string(),
                json: false,
            })
        );
    }

    #[test]
    fn test_v2_loglevel_is_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "c.yaml",
            "version: v2\nlogging:\n  loglevel: DEBUG\n  format: json\n",
        );
        let settings = LogSettings::from_config(&load_config(&path).unwrap()).unwrap();
        assert_eq!(settings.level, "debug");
        assert!(settings.json);
    }

    #[test]
    fn test_unknown_loglevel_fails_hook() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "c.json",
            r#"{"version": "v2", "logging": {"loglevel": "loud"}}"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(
            matches!(err, ClassyError::Hook { ref class, .. } if class == "ConfigLogging"),
            "Expected Hook error, got: {err}"
        );
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "c.json", r#"{"version": "v3"}"#);
        assert!(matches!(
            load_config(&path),
            Err(ClassyError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_run_config_prints_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "c.json", r#"{"version": "v2", "name": "x", "extra": 1}"#);
        let args = ConfigArgs {
            file: None,
            pretty: false,
        };
        let mut out = Vec::new();
        assert_eq!(run_config(&args, Some(&path), &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            concat!(
                r#"{"version":"v2","name":"x","#,
                r#""logging":{"loglevel":"info","format":"text"}}"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_run_config_invalid_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "c.json",
            r#"{"version": "v2", "logging": {"color": true}}"#,
        );
        let args = ConfigArgs {
            file: Some(path),
            pretty: false,
        };
        assert_eq!(run_config(&args, None, &mut Vec::new()).unwrap(), 1);
    }

    #[test]
    fn test_run_config_without_file_is_error() {
        let args = ConfigArgs {
            file: None,
            pretty: false,
        };
        assert!(run_config(&args, None, &mut Vec::new()).is_err());
    }
}
