use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Library settings used when the metadata itself does not decide a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Port reported when running outside the platform and no `port`
    /// option is given.
    #[serde(default = "default_port")]
    pub default_port: u16,
    /// Bind address when the application section carries no `host`.
    #[serde(default = "default_bind")]
    pub default_bind: String,
    /// URL scheme override. `None` = `http` locally, `https` on the platform.
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging settings, consumed by `cfenv-observability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_port() -> u16 { 8080 }
fn default_bind() -> String { "localhost".into() }
fn default_log_level() -> String { "info".into() }

// ── Impls ─────────────────────────────────────────────────────

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            default_bind: default_bind(),
            protocol: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl EnvConfig {
    /// Load configuration from YAML file + `CFENV_` env overrides
    /// (`CFENV_LOG__LEVEL=debug` sets `log.level`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: EnvConfig = Self::figment(path).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("CFENV_").split("__"))
    }
}
