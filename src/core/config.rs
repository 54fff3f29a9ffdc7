//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Credentials from `.env` are already in the environment by the time
//! `resolve()` runs.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inference::OPENAI_CHATGPT;
use crate::inference::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model_choice: Option<String>,
    pub show_diagram: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_choice: String,
    pub show_diagram: bool,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    load_config_from(&path)
}

/// Parses the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ParleyConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    // Keep the key out of the log
    debug!(
        "Config: model_choice={:?}, show_diagram={:?}, openai.model={:?}, openai.base_url={:?}",
        config.general.model_choice,
        config.general.show_diagram,
        config.openai.model,
        config.openai.base_url
    );
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# parley configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model_choice = "OpenAI ChatGPT"    # Or set PARLEY_MODEL_CHOICE / --model-choice
# show_diagram = true                 # Draw the chatbot graph above the chat

# [openai]
# api_key = "sk-..."                  # Or set OPENAI_API_KEY env var (or .env)
# base_url = "https://api.openai.com/v1"
# model = "gpt-4o-mini"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_model_choice` is the `--model-choice` flag (None = not specified).
pub fn resolve(config: &ParleyConfig, cli_model_choice: Option<&str>) -> ResolvedConfig {
    // Model choice: CLI → env → config → default
    let model_choice = cli_model_choice
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PARLEY_MODEL_CHOICE").ok())
        .or_else(|| config.general.model_choice.clone())
        .unwrap_or_else(|| OPENAI_CHATGPT.to_string());

    // API key: env → config
    let openai_api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.openai.api_key.clone());

    // Base URL: env → config → default
    let openai_base_url = std::env::var("OPENAI_BASE_URL")
        .ok()
        .or_else(|| config.openai.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    // Model: env → config → default
    let openai_model = std::env::var("OPENAI_MODEL")
        .ok()
        .or_else(|| config.openai.model.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

    ResolvedConfig {
        model_choice,
        show_diagram: config.general.show_diagram.unwrap_or(true),
        openai_api_key,
        openai_base_url,
        openai_model,
    }
}
