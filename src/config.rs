//! Runtime configuration
//!
//! One `Config` is constructed at startup and passed by reference to the
//! pieces that need it. No process-wide globals.

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the store files live. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Minutes east of UTC for this deployment's users
    #[serde(default)]
    pub utc_offset_mins: i32,

    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Plan window defaults for summary runs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub lookback_days: u32,

    #[serde(default)]
    pub lookahead_days: u32,
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path()?)
    }

    /// Load from an explicit path, falling back to defaults when the file
    /// does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.check_offset()?;
        Ok(config)
    }

    fn check_offset(&self) -> Result<()> {
        FixedOffset::east_opt(self.utc_offset_mins * 60)
            .with_context(|| format!("utc_offset_mins {} out of range", self.utc_offset_mins))?;
        Ok(())
    }

    /// The deployment timezone as a fixed offset. Out-of-range values are
    /// rejected at load time; this falls back to UTC rather than panic.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_mins * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Resolve the store directory: explicit override or the platform
    /// data dir
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir().context("Could not determine platform data directory")?;
        Ok(base.join("tasky"))
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine platform config directory")?;
    Ok(base.join("tasky").join("config.toml"))
}
