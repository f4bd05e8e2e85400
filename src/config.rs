//! Configuration loading.
//!
//! The config file is optional and only read when passed explicitly.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::parse::{Parser, DEFAULT_MAX_LINE_LEN};

/// Config file structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosts files used when none are given on the command line.
    pub files: Vec<PathBuf>,
    /// Longest accepted line in bytes.
    pub max_line_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl Config {
    /// Load config from path.
    pub fn load(path: &Path) -> Result<Config> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config =
            toml::from_str(&s).with_context(|| format!("parsing config {}", path.display()))?;
        if cfg.max_line_len == 0 {
            anyhow::bail!("{}: max_line_len must be positive", path.display());
        }
        Ok(cfg)
    }

    /// Load config from path if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Config::default()),
        }
    }

    /// Save config to path. Creates parent dirs if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Parser configured from this config.
    pub fn parser(&self) -> Parser {
        Parser::new().max_line_len(self.max_line_len)
    }

    /// Files from the command line, falling back to the configured ones.
    pub fn files_or(&self, args: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        let files = if args.is_empty() {
            self.files.clone()
        } else {
            args
        };
        if files.is_empty() {
            anyhow::bail!("no hosts files given; pass them as arguments or set `files` in --config");
        }
        Ok(files)
    }
}
