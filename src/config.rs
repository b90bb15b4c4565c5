use crate::kanban::BoardConfig;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::{collections::HashSet, path::Path, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub table: TableConfig,
    pub board: BoardConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub dev_server: DevServerConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TableConfig {
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct SessionConfig {
    /// Artificial delay applied to every repository call, in milliseconds
    #[serde(default)]
    pub simulated_latency_ms: u64,
    /// Directory of JSON fixtures used to seed repositories
    #[serde(default)]
    pub fixtures_dir: Option<String>,
}

impl SessionConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Local development proxy settings.
///
/// Carried for front ends that forward an API prefix to a backend; nothing
/// in this crate issues requests under it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DevServerConfig {
    pub api_prefix: String,
    pub proxy_target: String,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            proxy_target: "http://localhost:8080".to_string(),
        }
    }
}

/// Default configuration embedded in the library
const DEFAULT_CONFIG: &str = r#"
[table]
page_size = 10

[board]
name = "Project Board"
columns = ["Not Started", "In Progress", "On Hold", "Completed"]

[session]
simulated_latency_ms = 0

[dev_server]
api_prefix = "/api"
proxy_target = "http://localhost:8080"
"#;

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            table: TableConfig { page_size: 10 },
            board: BoardConfig::default(),
            session: SessionConfig::default(),
            dev_server: DevServerConfig::default(),
        }
    }
}

impl ConsoleConfig {
    fn validate(self) -> anyhow::Result<Self> {
        if self.table.page_size == 0 {
            bail!("table.page_size must be at least 1");
        }
        if self.board.columns.is_empty() {
            bail!("board.columns must name at least one column");
        }
        let mut seen = HashSet::new();
        for column in &self.board.columns {
            if !seen.insert(column.as_str()) {
                bail!("board.columns lists '{}' more than once", column);
            }
        }
        Ok(self)
    }
}

/// Parses a configuration document
pub fn parse_config(contents: &str) -> anyhow::Result<ConsoleConfig> {
    let config: ConsoleConfig = toml::from_str(contents).context("invalid console configuration")?;
    config.validate()
}

/// Load configuration from a TOML file
///
/// Falls back to the embedded default when no path is given or the file
/// does not exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ConsoleConfig> {
    if let Some(path) = path {
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return parse_config(&contents);
        }
        tracing::warn!("Config file not found at: {}", path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}
