// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Layers, lowest precedence first: built-in defaults, a JSON config file,
// `TILLPRINT_*` environment variables.  Command-line flags are applied on
// top by the binary.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TillprintError};

/// Name of the config file looked up in the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TILLPRINT_CONFIG";

/// Smallest paper width (in characters) the receipt layouts fit into.
pub const MIN_PAPER_WIDTH: usize = 24;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub spooler: SpoolerConfig,
    pub queue: QueueConfig,
    pub receipt: ReceiptLayout,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
        }
    }
}

/// Which spooler implementation the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoolerBackend {
    /// The host's CUPS installation via `lp`/`lpstat`.
    #[default]
    Cups,
    /// Virtual printers held in memory.
    Memory,
}

impl std::str::FromStr for SpoolerBackend {
    type Err = TillprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cups" => Ok(Self::Cups),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(TillprintError::Config(format!(
                "unknown spooler backend '{other}' (expected 'cups' or 'memory')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoolerConfig {
    pub backend: SpoolerBackend,
    pub refresh_interval_secs: u64,
    pub lp_command: String,
    pub lpstat_command: String,
}

impl Default for SpoolerConfig {
    fn default() -> Self {
        Self {
            backend: SpoolerBackend::Cups,
            refresh_interval_secs: 30,
            lp_command: "lp".into(),
            lpstat_command: "lpstat".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Static text and geometry used by the receipt layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptLayout {
    pub business_name: String,
    pub header_lines: Vec<String>,
    pub footer_lines: Vec<String>,
    /// Characters per line in the normal font.
    pub paper_width: usize,
    pub currency_symbol: String,
    /// Send a partial cut after the receipt.
    pub cut: bool,
    /// Blank lines fed before the cut.
    pub feed_lines: u8,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self {
            business_name: "Tillprint".into(),
            header_lines: Vec::new(),
            footer_lines: vec!["Thank you!".into()],
            paper_width: 48,
            currency_symbol: "$".into(),
            cut: true,
            feed_lines: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration from `path` (else `$TILLPRINT_CONFIG`, else the
    /// default location) and the process environment, then validate it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = data_dir().join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.  Missing sections and fields keep their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TillprintError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = serde_json::from_str(&raw).map_err(|e| {
            TillprintError::Config(format!("invalid config file {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `TILLPRINT_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TILLPRINT_HOST") {
            self.server.host = host.parse().map_err(|_| {
                TillprintError::Config(format!("TILLPRINT_HOST is not an IP address: {host}"))
            })?;
        }
        if let Some(port) = lookup("TILLPRINT_PORT") {
            self.server.port = port.parse().map_err(|_| {
                TillprintError::Config(format!("TILLPRINT_PORT is not a port number: {port}"))
            })?;
        }
        if let Some(level) = lookup("TILLPRINT_LOG_LEVEL") {
            self.telemetry.log_level = level;
        }
        if let Some(capacity) = lookup("TILLPRINT_QUEUE_CAPACITY") {
            self.queue.capacity = capacity.parse().map_err(|_| {
                TillprintError::Config(format!(
                    "TILLPRINT_QUEUE_CAPACITY is not a number: {capacity}"
                ))
            })?;
        }
        if let Some(backend) = lookup("TILLPRINT_SPOOLER") {
            self.spooler.backend = backend.parse()?;
        }
        Ok(())
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.queue.capacity == 0 {
            return Err(TillprintError::Config(
                "queue.capacity must be at least 1".into(),
            ));
        }
        if self.spooler.refresh_interval_secs == 0 {
            return Err(TillprintError::Config(
                "spooler.refresh_interval_secs must be at least 1".into(),
            ));
        }
        if self.receipt.paper_width < MIN_PAPER_WIDTH {
            return Err(TillprintError::Config(format!(
                "receipt.paper_width must be at least {MIN_PAPER_WIDTH} characters, got {}",
                self.receipt.paper_width
            )));
        }
        if !self.server.host.is_loopback() {
            warn!(
                host = %self.server.host,
                "binding to a non-loopback address; the service has no authentication"
            );
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.spooler.refresh_interval_secs)
    }
}

/// Return the application data directory.
///
/// Uses `$XDG_DATA_HOME/tillprint`, then `~/.local/share/tillprint`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    };
    base.join("tillprint")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.queue.capacity, 10);
        assert_eq!(config.spooler.refresh_interval_secs, 30);
        assert_eq!(config.spooler.backend, SpoolerBackend::Cups);
        assert_eq!(config.receipt.paper_width, 48);
        assert_eq!(config.telemetry.log_level, "info");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"{ "server": { "port": 4100 }, "receipt": { "business_name": "Corner Cafe" } }"#,
        )
        .expect("write config");

        let config = AppConfig::from_file(&path).expect("load");
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.receipt.business_name, "Corner Cafe");
        assert_eq!(config.receipt.footer_lines, vec!["Thank you!".to_string()]);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write config");

        let err = AppConfig::from_file(&path).expect_err("should fail");
        assert!(matches!(err, TillprintError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::load(Some(&dir.path().join("absent.json"))).expect_err("should fail");
        assert!(matches!(err, TillprintError::Config(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.server.port = 4100;
        config
            .apply_env(env(&[
                ("TILLPRINT_PORT", "5200"),
                ("TILLPRINT_SPOOLER", "memory"),
                ("TILLPRINT_QUEUE_CAPACITY", "3"),
                ("TILLPRINT_LOG_LEVEL", "debug"),
            ]))
            .expect("apply env");
        assert_eq!(config.server.port, 5200);
        assert_eq!(config.spooler.backend, SpoolerBackend::Memory);
        assert_eq!(config.queue.capacity, 3);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("TILLPRINT_PORT", "abc")])).is_err());
        assert!(config.apply_env(env(&[("TILLPRINT_HOST", "localhost:1")])).is_err());
        assert!(config.apply_env(env(&[("TILLPRINT_SPOOLER", "lpd")])).is_err());
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let mut config = AppConfig::default();
        config.queue.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.spooler.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.receipt.paper_width = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_loopback_host_is_allowed() {
        let mut config = AppConfig::default();
        config.server.host = IpAddr::from([0, 0, 0, 0]);
        config.validate().expect("warned, not rejected");
    }
}
