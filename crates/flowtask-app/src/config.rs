use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use flowtask_core::TaskFilter;
use flowtask_store::LatencyProfile;
use serde::Deserialize;

use crate::filter_util::{parse_priority_filter, parse_status_filter};

const CONFIG_DIR: &str = ".flowtask";
const CONFIG_FILE: &str = "config.toml";

/// Top-level project configuration loaded from `.flowtask/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Where tasks come from and how slowly the store answers.
    #[serde(default)]
    pub store: StoreConfig,
    /// Filters the view starts with.
    #[serde(default)]
    pub view: ViewConfig,
}

impl ProjectConfig {
    /// Load configuration from a working directory; a missing file yields defaults.
    ///
    /// A relative seed path is resolved against `workdir`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it fails validation.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let workdir = workdir.as_ref();
        let config_path = workdir.join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        if let Some(seed) = config.store.seed.take() {
            config.store.seed = Some(workdir.join(seed));
        }
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.view.default_filter()?;
        if let Some(seed) = &self.store.seed
            && !seed.is_file()
        {
            bail!("seed file {} does not exist", seed.display());
        }
        Ok(())
    }
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON task array to start from.
    #[serde(default)]
    pub seed: Option<PathBuf>,
    /// Whether operations wait out a simulated network delay.
    #[serde(default = "default_true")]
    pub simulate_latency: bool,
    /// Per-operation delay overrides.
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: None,
            simulate_latency: true,
            latency: LatencyConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Latency profile with per-operation overrides applied.
    #[must_use]
    pub fn latency_profile(&self) -> LatencyProfile {
        if !self.simulate_latency {
            return LatencyProfile::none();
        }
        let base = LatencyProfile::default();
        let pick = |value: Option<u64>, fallback: Duration| value.map_or(fallback, Duration::from_millis);
        LatencyProfile {
            get_all: pick(self.latency.get_all, base.get_all),
            get_by_id: pick(self.latency.get_by_id, base.get_by_id),
            create: pick(self.latency.create, base.create),
            update: pick(self.latency.update, base.update),
            delete: pick(self.latency.delete, base.delete),
            bulk_delete: pick(self.latency.bulk_delete, base.bulk_delete),
            mark: pick(self.latency.mark, base.mark),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// `[store.latency]` block, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    /// Delay for listing every task.
    pub get_all: Option<u64>,
    /// Delay for fetching one task.
    pub get_by_id: Option<u64>,
    /// Delay for creating a task.
    pub create: Option<u64>,
    /// Delay for updating a task.
    pub update: Option<u64>,
    /// Delay for deleting one task.
    pub delete: Option<u64>,
    /// Delay for deleting several tasks at once.
    pub bulk_delete: Option<u64>,
    /// Extra delay for marking a task complete or incomplete.
    pub mark: Option<u64>,
}

/// `[view]` block.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ViewConfig {
    /// Initial priority filter token.
    #[serde(default)]
    pub priority: Option<String>,
    /// Initial status filter token.
    #[serde(default)]
    pub status: Option<String>,
}

impl ViewConfig {
    /// Filter the view starts with.
    ///
    /// # Errors
    /// Returns an error when a configured token is not recognized.
    pub fn default_filter(&self) -> Result<TaskFilter> {
        let mut filter = TaskFilter::default();
        if let Some(token) = &self.priority {
            filter.priority = parse_priority_filter(token)
                .map_err(|err| anyhow::anyhow!(err.describe_user_facing()))?;
        }
        if let Some(token) = &self.status {
            filter.status = parse_status_filter(token)
                .map_err(|err| anyhow::anyhow!(err.describe_user_facing()))?;
        }
        Ok(filter)
    }
}
