//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.dialogix/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DialogixConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_persona: Option<String>,
    pub offline: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub chat_base_url: Option<String>,
    pub nlp_base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CHAT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_NLP_BASE_URL: &str = "http://127.0.0.1:8001";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Persona to open directly, skipping the Home view.
    pub persona: Option<String>,
    pub offline: bool,
    pub chat_base_url: String,
    pub nlp_base_url: String,
}

/// Values taken from the command line (None/false = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub persona: Option<&'a str>,
    pub offline: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.dialogix/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".dialogix").join("config.toml"))
}

/// Load config from `~/.dialogix/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DialogixConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DialogixConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DialogixConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path. See [`load_config`].
pub fn load_config_from(path: &Path) -> Result<DialogixConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(DialogixConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DialogixConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Dialogix Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_persona = "zen"            # Open this persona directly (or DIALOGIX_PERSONA)
# offline = false                    # Use canned persona replies instead of the backend

# [backend]
# chat_base_url = "http://127.0.0.1:8000"   # Or set DIALOGIX_CHAT_URL
# nlp_base_url = "http://127.0.0.1:8001"    # Or set DIALOGIX_NLP_URL
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DialogixConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &DialogixConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Persona: CLI → env → config
    let persona = cli
        .persona
        .map(|s| s.to_string())
        .or_else(|| env("DIALOGIX_PERSONA"))
        .or_else(|| config.general.default_persona.clone());

    // Chat URL: env → config → default
    let chat_base_url = env("DIALOGIX_CHAT_URL")
        .or_else(|| config.backend.chat_base_url.clone())
        .unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string());

    // NLP URL: env → config → default
    let nlp_base_url = env("DIALOGIX_NLP_URL")
        .or_else(|| config.backend.nlp_base_url.clone())
        .unwrap_or_else(|| DEFAULT_NLP_BASE_URL.to_string());

    ResolvedConfig {
        persona,
        offline: cli.offline || config.general.offline.unwrap_or(false),
        chat_base_url,
        nlp_base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&DialogixConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.persona, None);
        assert!(!resolved.offline);
        assert_eq!(resolved.chat_base_url, DEFAULT_CHAT_BASE_URL);
        assert_eq!(resolved.nlp_base_url, DEFAULT_NLP_BASE_URL);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = DialogixConfig {
            general: GeneralConfig {
                default_persona: Some("poet".to_string()),
                offline: Some(true),
            },
            backend: BackendConfig {
                chat_base_url: Some("http://chat.local".to_string()),
                nlp_base_url: Some("http://nlp.local".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.persona.as_deref(), Some("poet"));
        assert!(resolved.offline);
        assert_eq!(resolved.chat_base_url, "http://chat.local");
        assert_eq!(resolved.nlp_base_url, "http://nlp.local");
    }

    #[test]
    fn test_env_overrides_config() {
        let config = DialogixConfig {
            general: GeneralConfig {
                default_persona: Some("poet".to_string()),
                ..Default::default()
            },
            backend: BackendConfig {
                chat_base_url: Some("http://chat.local".to_string()),
                ..Default::default()
            },
        };
        let env = |key: &str| match key {
            "DIALOGIX_PERSONA" => Some("chef".to_string()),
            "DIALOGIX_CHAT_URL" => Some("http://env.local".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.persona.as_deref(), Some("chef"));
        assert_eq!(resolved.chat_base_url, "http://env.local");
        assert_eq!(resolved.nlp_base_url, DEFAULT_NLP_BASE_URL);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = DialogixConfig {
            general: GeneralConfig {
                default_persona: Some("poet".to_string()),
                offline: Some(false),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            persona: Some("detective"),
            offline: true,
        };
        let env = |key: &str| (key == "DIALOGIX_PERSONA").then(|| "chef".to_string());
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.persona.as_deref(), Some("detective"));
        assert!(resolved.offline);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[backend]
nlp_base_url = "http://10.0.0.5:8001"
"#;
        let config: DialogixConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.nlp_base_url.as_deref(), Some("http://10.0.0.5:8001"));
        assert!(config.backend.chat_base_url.is_none());
        assert!(config.general.default_persona.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("dialogix-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.general.default_persona.is_none());
        assert!(path.exists());

        // The generated file is all comments, so it parses back to defaults
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.backend.chat_base_url.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("dialogix-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\ndefault_persona = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
