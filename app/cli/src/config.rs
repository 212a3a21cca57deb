//! FILENAME: app/cli/src/config.rs
//! PURPOSE: Optional JSON config document for the command-line tool.
//! CONTEXT: Every field has a default, so a config file only names what it
//! changes. Command-line flags are applied on top of the loaded values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use persistence::{
    CsvOptions, Delimiter, ExchangeOptions, JsonOptions, MalformedPolicy, NullRendering,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub csv: CsvOptions,
    pub json: JsonOptions,
    /// Rows printed by `show` when `--head` is not given.
    pub head: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            csv: CsvOptions::default(),
            json: JsonOptions::default(),
            head: 10,
        }
    }
}

/// Codec flags that override the config document.
#[derive(Debug, Clone, Default)]
pub struct CodecOverrides {
    pub delimiter: Option<char>,
    pub null_literal: bool,
    pub strict: bool,
    pub indent: Option<usize>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<CliConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<CliConfig> {
        match path {
            Some(path) => CliConfig::load(path),
            None => Ok(CliConfig::default()),
        }
    }

    pub fn apply(&mut self, overrides: &CodecOverrides) -> Result<()> {
        if let Some(delimiter) = overrides.delimiter {
            self.csv.delimiter = Delimiter::try_from(delimiter).context("Invalid --delimiter")?;
        }
        if overrides.null_literal {
            self.csv.null_rendering = NullRendering::Literal;
        }
        if overrides.strict {
            self.csv.on_malformed = MalformedPolicy::Fail;
        }
        if let Some(indent) = overrides.indent {
            self.json.indent = indent;
        }
        Ok(())
    }

    pub fn exchange(&self) -> ExchangeOptions {
        ExchangeOptions {
            csv: self.csv.clone(),
            json: self.json.clone(),
        }
    }
}
