//! User configuration: persistence and defaults.
//!
//! Loaded from `~/.config/gatekeeper/config.toml` merged with
//! `GATEKEEPER_`-prefixed environment variables; every field has a default so
//! the app runs with no config file present.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the knowledge-base service lives and how to start it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Binary used to start the backend when the port probe fails.
    /// Defaults to `gatekeeper` on PATH.
    #[serde(default)]
    pub serve_command: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            serve_command: None,
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn serve_command(&self) -> (PathBuf, Vec<String>) {
        let command = self
            .serve_command
            .clone()
            .unwrap_or_else(|| PathBuf::from("gatekeeper"));
        (command, vec!["--serve".to_string()])
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Indicator animation period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Maximum number of characters accepted by the input field.
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            char_limit: default_char_limit(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6969
}

fn default_tick_ms() -> u64 {
    120
}

fn default_char_limit() -> usize {
    280
}

impl UserConfig {
    /// Load from the default config path and environment, falling back to
    /// defaults when neither is present.
    pub fn load() -> color_eyre::Result<UserConfig> {
        let config = config::Config::builder()
            .add_source(
                config::File::with_name(&Self::default_config_path().to_string_lossy())
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("GATEKEEPER").separator("_"))
            .build()?
            .try_deserialize::<UserConfig>()
            .unwrap_or_else(|e| {
                tracing::warn!("invalid config, using defaults: {}", e);
                UserConfig::default()
            });
        Ok(config)
    }

    /// Save the configuration to the specified path.
    pub fn save_to_path(&self, path: &std::path::Path) -> color_eyre::Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        use std::io::Write as _;
        tmp.write_all(toml_str.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }

    /// Load configuration from the specified path.
    pub fn load_from_path(path: &std::path::Path) -> color_eyre::Result<UserConfig> {
        let content = std::fs::read_to_string(path)?;
        let cfg: UserConfig = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Default config.toml path: ~/.config/gatekeeper/config.toml
    pub fn default_config_path() -> std::path::PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("gatekeeper")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = UserConfig::default();
        assert_eq!(config.backend.base_url(), "http://localhost:6969");
        assert_eq!(config.backend.addr(), "localhost:6969");
        assert_eq!(config.ui.char_limit, 280);
    }

    #[test]
    fn serve_command_defaults_to_path_binary() {
        let (command, args) = BackendConfig::default().serve_command();
        assert_eq!(command, PathBuf::from("gatekeeper"));
        assert_eq!(args, vec!["--serve".to_string()]);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = UserConfig {
            backend: BackendConfig {
                host: "127.0.0.1".to_string(),
                port: 7070,
                serve_command: Some(PathBuf::from("/usr/local/bin/gatekeeper")),
            },
            ui: UiConfig::default(),
        };
        config.save_to_path(&path).unwrap();
        let reloaded = UserConfig::load_from_path(&path).unwrap();
        assert_eq!(reloaded.backend.base_url(), "http://127.0.0.1:7070");
        assert_eq!(
            reloaded.backend.serve_command().0,
            PathBuf::from("/usr/local/bin/gatekeeper")
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: UserConfig = toml::from_str("[backend]\nport = 7171\n").unwrap();
        assert_eq!(cfg.backend.port, 7171);
        assert_eq!(cfg.backend.host, "localhost");
        assert_eq!(cfg.ui.tick_ms, 120);
    }
}
