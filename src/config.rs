//! Configuration stored as a small TOML file next to the database. The only
//! setting today is the slide size; it is written back whenever the operator
//! changes it on the live screen so the choice survives restarts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::SlideSize;

/// File name inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// On-disk shape of the config file. Kept separate from [`Config`] so the
/// file stays plain numbers while the application works with typed values.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    lines_per_slide: usize,
}

/// Validated application configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// How many lyric lines each presentation slide carries.
    pub slide_size: SlideSize,
}

/// Load the config from the data directory. A missing file yields the
/// defaults; a file with an unsupported slide size is an error, surfaced so
/// the caller can warn and fall back rather than silently blanking slides.
pub fn load(dir: &Path) -> Result<Config> {
    let path = config_path(dir);
    if !path.exists() {
        return Ok(Config::default());
    }

    let raw = fs::read_to_string(&path).context("failed to read config file")?;
    let file: ConfigFile = toml::from_str(&raw).context("failed to parse config file")?;
    let slide_size = SlideSize::from_lines(file.lines_per_slide)
        .context("config holds an invalid slide size")?;

    Ok(Config { slide_size })
}

/// Persist the config, creating the data directory if needed.
pub fn store(dir: &Path, config: Config) -> Result<()> {
    fs::create_dir_all(dir).context("failed to create data directory")?;

    let file = ConfigFile {
        lines_per_slide: config.slide_size.lines(),
    };
    let raw = toml::to_string_pretty(&file).context("failed to serialize config")?;
    fs::write(config_path(dir), raw).context("failed to write config file")?;
    Ok(())
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config.slide_size, SlideSize::Double);
    }

    #[test]
    fn round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            slide_size: SlideSize::Quad,
        };
        store(dir.path(), config).unwrap();
        assert_eq!(load(dir.path()).unwrap(), config);
    }

    #[test]
    fn unsupported_size_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "lines_per_slide = 3\n").unwrap();
        assert!(load(dir.path()).is_err());
    }
}
