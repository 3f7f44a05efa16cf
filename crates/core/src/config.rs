//! Application configuration.
//!
//! Values come from built-in defaults, then `config.toml` under the user's
//! config directory, then `SPENDTRACK_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::{
    console::{Frame, DEFAULT_FRAME_SYMBOL, DEFAULT_FRAME_WIDTH},
    store::DEFAULT_DATA_FILE,
};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "spendtrack";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_MAX_PASSWORD_ATTEMPTS: i64 = 3;
const DEFAULT_RETRY_DELAY_SECS: i64 = 5;

/// Runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// JSON document holding every user record.
    pub data_path: PathBuf,
    /// Optional newline-separated list of passwords considered too common.
    #[serde(default)]
    pub common_passwords_path: Option<PathBuf>,
    /// Password attempts allowed per login before the process ends.
    pub max_password_attempts: u32,
    /// Pause after each wrong password.
    pub retry_delay_secs: u64,
    /// Border character for framed output.
    pub frame_symbol: String,
    /// Border width for framed output.
    pub frame_width: usize,
}

impl AppConfig {
    /// Load from the default config file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the config file, which may be absent.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("data_path", default_data_path().to_string_lossy().into_owned())?
            .set_default("max_password_attempts", DEFAULT_MAX_PASSWORD_ATTEMPTS)?
            .set_default("retry_delay_secs", DEFAULT_RETRY_DELAY_SECS)?
            .set_default("frame_symbol", DEFAULT_FRAME_SYMBOL.to_string())?
            .set_default("frame_width", DEFAULT_FRAME_WIDTH as i64)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("SPENDTRACK"))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        anyhow::ensure!(
            config.max_password_attempts > 0,
            "invalid configuration: max_password_attempts must be at least 1"
        );
        info!("configuration loaded; data at {}", config.data_path.display());
        Ok(config)
    }

    /// Border built from `frame_symbol` and `frame_width`.
    pub fn frame(&self) -> Frame {
        let symbol = self.frame_symbol.chars().next().unwrap_or(DEFAULT_FRAME_SYMBOL);
        Frame::new(symbol, self.frame_width)
    }
}

/// Location of the config file under the user's config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default location of the user data document.
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_FILE)
}

/// Write a commented default config file unless one already exists.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, default_config_contents())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}

fn default_config_contents() -> String {
    let data_path = default_data_path().to_string_lossy().replace('\\', "\\\\");
    format!(
        r#"# Spending tracker configuration.

# JSON document holding every user record.
data_path = "{data_path}"

# Newline-separated list of passwords to reject as too common.
# common_passwords_path = "/path/to/common-passwords.txt"

# Wrong passwords allowed per login before the program ends.
max_password_attempts = {DEFAULT_MAX_PASSWORD_ATTEMPTS}

# Seconds to wait after a wrong password.
retry_delay_secs = {DEFAULT_RETRY_DELAY_SECS}

# Border used around framed messages.
frame_symbol = "{DEFAULT_FRAME_SYMBOL}"
frame_width = {DEFAULT_FRAME_WIDTH}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_a_file() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join(CONFIG_FILE))?;
        assert_eq!(config.max_password_attempts, 3);
        assert_eq!(config.retry_delay_secs, 5);
        assert_eq!(config.frame(), Frame::default());
        assert!(config.common_passwords_path.is_none());
        assert!(config.data_path.ends_with(DEFAULT_DATA_FILE));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
data_path = "/tmp/spendtrack-test/users.json"
common_passwords_path = "/tmp/common.txt"
max_password_attempts = 5
retry_delay_secs = 0
frame_symbol = "="
frame_width = 20
"#,
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_path, PathBuf::from("/tmp/spendtrack-test/users.json"));
        assert_eq!(config.common_passwords_path, Some(PathBuf::from("/tmp/common.txt")));
        assert_eq!(config.max_password_attempts, 5);
        assert_eq!(config.retry_delay_secs, 0);
        assert_eq!(config.frame(), Frame::new('=', 20));
        Ok(())
    }

    #[test]
    fn zero_password_attempts_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "max_password_attempts = 0\n")?;
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_password_attempts"));
        Ok(())
    }

    #[test]
    fn default_file_is_written_once_and_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(APP_DIR).join(CONFIG_FILE);
        write_default_config(&path)?;
        assert!(path.exists());

        fs::write(&path, "frame_width = 10\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "frame_width = 10\n");

        fs::remove_file(&path)?;
        write_default_config(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.frame_width, DEFAULT_FRAME_WIDTH);
        Ok(())
    }
}
