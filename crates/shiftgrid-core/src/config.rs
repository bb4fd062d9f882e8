use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 30_000; // whole save batch, all cells
pub const DEFAULT_NOTIFY_CAPACITY: usize = 16;

/// Top-level config (shiftgrid.toml + SHIFTGRID_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftgridConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Where the schedule server lives and how long a single request may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// What happens to still-pending edits when the period is re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// The fresh baseline wins; every unsaved edit is dropped.
    Discard,
    /// Unsaved edits are re-applied on top of the fresh baseline.
    #[default]
    Rebase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Deadline for a whole save batch. Expiry leaves every edit pending.
    #[serde(default = "default_batch_timeout_ms")]
    pub batch_timeout_ms: u64,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Buffer size of the sync-report channel handed to the owner.
    #[serde(default = "default_notify_capacity")]
    pub notify_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}
fn default_batch_timeout_ms() -> u64 {
    DEFAULT_BATCH_TIMEOUT_MS
}
fn default_notify_capacity() -> usize {
    DEFAULT_NOTIFY_CAPACITY
}

impl ShiftgridConfig {
    /// Load config from a TOML file with SHIFTGRID_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `SHIFTGRID_API__BASE_URL=http://sched.local:8000`.
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ShiftgridConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SHIFTGRID_").split("__"))
            .extract()
            .map_err(|e| crate::error::ShiftgridError::Config(e.to_string()))?;

        tracing::debug!(path = %path, base_url = %config.api.base_url, "config loaded");
        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.shiftgrid/shiftgrid.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let cfg = ShiftgridConfig::load(Some("does-not-exist.toml")).expect("load");
            assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
            assert_eq!(cfg.sync.batch_timeout_ms, DEFAULT_BATCH_TIMEOUT_MS);
            assert_eq!(cfg.sync.refresh_policy, RefreshPolicy::Rebase);
            Ok(())
        });
    }

    #[test]
    fn toml_and_env_are_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shiftgrid.toml",
                r#"
                [api]
                base_url = "http://sched.local:9000"

                [sync]
                refresh_policy = "discard"
                "#,
            )?;
            jail.set_env("SHIFTGRID_SYNC__BATCH_TIMEOUT_MS", "500");

            let cfg = ShiftgridConfig::load(Some("shiftgrid.toml")).expect("load");
            assert_eq!(cfg.api.base_url, "http://sched.local:9000");
            assert_eq!(cfg.api.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
            assert_eq!(cfg.sync.refresh_policy, RefreshPolicy::Discard);
            assert_eq!(cfg.sync.batch_timeout_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn bad_value_is_a_config_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[sync]\nbatch_timeout_ms = \"soon\"\n")?;
            let err = ShiftgridConfig::load(Some("bad.toml")).unwrap_err();
            assert_eq!(err.code(), "CONFIG_ERROR");
            Ok(())
        });
    }
}
