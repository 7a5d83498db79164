//! Configuration management for the DGI Motors storefront.
//!
//! Handles loading and saving configuration from JSONC files.
//! Selects the data source, the offered filter fields and display options.

use crate::filter::{FieldSet, FilterCriteria};
use crate::vehicles::{CurrencyFormat, DataSource};
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform config dir.
const APP_DIR: &str = "dgi-motors";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the vehicle list comes from
    pub source: DataSource,
    /// Filter fields offered in the form; defaults depend on the source
    pub fields: Option<FieldSet>,
    /// Criteria active when the storefront opens
    pub default_filters: FilterCriteria,
    /// Treat a typed `0` in a numeric field as "no constraint"
    pub zero_disables_bounds: bool,
    /// Offer the details view; defaults depend on the source
    pub show_details: Option<bool>,
    /// Price rendering conventions
    pub currency: CurrencyFormat,
    /// Timeout for the listing request; no timeout when absent
    pub request_timeout_secs: Option<u64>,
    /// Log file path (relative to config dir or absolute)
    pub log_path: String,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            fields: None,
            default_filters: FilterCriteria::default(),
            zero_disables_bounds: true,
            show_details: None,
            currency: CurrencyFormat::default(),
            request_timeout_secs: None,
            log_path: "dgi-motors.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// A missing file yields the default configuration (static catalog,
    /// all six filter fields). `//` and `/* */` comments are allowed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        serde_json::from_str(&strip_jsonc_comments(&content))
            .with_context(|| format!("Failed to deserialize config: {}", config_path.display()))
    }

    /// Save configuration to file, creating the directory if needed.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }

    /// Returns `$XDG_CONFIG_HOME/dgi-motors/config.jsonc` or `~/.config/dgi-motors/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.jsonc"))
    }

    /// Log file path; relative paths resolve against the config directory.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        let log_path = Path::new(&self.log_path);
        if log_path.is_absolute() {
            Ok(log_path.to_path_buf())
        } else {
            Ok(app_config_dir()?.join(log_path))
        }
    }

    /// Filter fields offered in the form.
    pub fn enabled_fields(&self) -> FieldSet {
        self.fields
            .clone()
            .unwrap_or_else(|| self.source.default_fields())
    }

    /// Whether cards link to a details view.
    pub fn details_enabled(&self) -> bool {
        self.show_details
            .unwrap_or_else(|| self.source.offers_details())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn app_config_dir() -> Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
    Ok(dir.join(APP_DIR))
}

/// Remove `//` line comments and `/* */` block comments outside strings.
fn strip_jsonc_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
