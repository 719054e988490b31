//! Client configuration: server URL and output directory.
//!
//! Each setting resolves in priority order:
//! 1. command-line flag
//! 2. environment variable (`FORMATR_SERVER_URL`, `FORMATR_OUTPUT_DIR`),
//!    after `.env.local` / `.env` are loaded
//! 3. `<config_dir>/formatr/config.json`
//! 4. built-in default

use crate::error::{FormatrError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const SERVER_URL_ENV: &str = "FORMATR_SERVER_URL";
pub const OUTPUT_DIR_ENV: &str = "FORMATR_OUTPUT_DIR";
const OUTPUT_FOLDER_NAME: &str = "FORMATR_Output";

/// Persisted settings. Every field is optional; unset fields fall through
/// to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Set one key by name (`server_url` / `serverUrl`, `output_dir` / `outputDir`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server_url" | "serverUrl" => self.server_url = Some(value.to_string()),
            "output_dir" | "outputDir" => self.output_dir = Some(PathBuf::from(value)),
            other => return Err(FormatrError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
}

/// Where the config file lives.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formatr")
        .join("config.json")
}

/// Load the config file. Missing or invalid files yield an empty config.
pub fn load_file(path: &Path) -> ConfigFile {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("[CONFIG] Ignoring invalid {}: {}", path.display(), e);
            ConfigFile::default()
        }),
        Err(_) => ConfigFile::default(),
    }
}

/// Persist the config file, creating its directory if needed.
pub fn save_file(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| FormatrError::Config(format!("Failed to create config dir: {}", e)))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| FormatrError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, json)
        .map_err(|e| FormatrError::Config(format!("Failed to write config: {}", e)))?;
    log::info!("[CONFIG] Saved {}", path.display());
    Ok(())
}

/// `~/Downloads/FORMATR_Output`, or `./FORMATR_Output` without a home.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(OUTPUT_FOLDER_NAME)
}

/// Resolve the effective config from flags, an environment lookup and the
/// config file.
pub fn resolve_with<F>(overrides: &Overrides, env: F, file: &ConfigFile) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let server_url = overrides
        .server_url
        .clone()
        .or_else(|| non_empty(env(SERVER_URL_ENV)))
        .or_else(|| file.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let output_dir = overrides
        .output_dir
        .clone()
        .or_else(|| non_empty(env(OUTPUT_DIR_ENV)).map(PathBuf::from))
        .or_else(|| file.output_dir.clone())
        .unwrap_or_else(default_output_dir);

    ClientConfig {
        server_url,
        output_dir,
    }
}

/// Resolve against the process environment and the default config file.
pub fn resolve(overrides: &Overrides) -> ClientConfig {
    let file = load_file(&config_path());
    let config = resolve_with(overrides, |k| std::env::var(k).ok(), &file);
    log::info!(
        "[CONFIG] server={} output={}",
        config.server_url,
        config.output_dir.display()
    );
    config
}

/// Load `.env.local`, else `.env`, from the working directory.
///
/// Runs before the logger exists so `RUST_LOG` can come from the file;
/// returns the file that was loaded for logging afterwards.
pub fn load_dotenv() -> Option<PathBuf> {
    'env_load: for env_file in [".env.local", ".env"] {
        let path = Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => return Some(path.to_path_buf()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'env_load;
        }
    }
    None
}
