//! Config file loading and merging with command-line arguments

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use logscope_logs::{DEFAULT_LIMIT, Direction, TraversalConfig};

use crate::Args;

/// Values read from `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub limit: Option<usize>,
    pub suppress_noise: Option<bool>,
    pub reverse: Option<bool>,
    pub group_by_timestamp: Option<bool>,
}

impl FileConfig {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("logscope").join("config.toml"))
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from the default location, if there is one
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug)]
pub struct Settings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub traversal: TraversalConfig,
    pub group_by_timestamp: bool,
    pub json: bool,
    pub debug_level: u8,
}

impl Settings {
    /// Merge arguments over file values; flags given on the command line win
    pub fn resolve(args: &Args, file: FileConfig) -> Self {
        let reverse = args.reverse || file.reverse.unwrap_or(false);

        let traversal = TraversalConfig {
            target_group: args.group.clone(),
            list_mode: args.list,
            limit: args.limit.or(file.limit).unwrap_or(DEFAULT_LIMIT),
            direction: if reverse {
                Direction::Reverse
            } else {
                Direction::Forward
            },
            forward_policy: args.forward_policy.into(),
            suppress_noise: args.suppress_noise || file.suppress_noise.unwrap_or(false),
            grep_pattern: args.grep.clone(),
            group_pattern: args.pattern.clone(),
        };

        Self {
            region: args.region.clone().or(file.region),
            profile: args.profile.clone().or(file.profile),
            traversal,
            group_by_timestamp: args.group_by_timestamp || file.group_by_timestamp.unwrap_or(false),
            json: args.json,
            debug_level: args.debug,
        }
    }
}
