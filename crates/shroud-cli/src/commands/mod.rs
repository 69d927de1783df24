pub mod completions;
pub mod config;
pub mod redact;
pub mod scan;

use anyhow::Result;
use shroud_config::Config;
use std::path::Path;

/// Explicit `--config` file, or the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
