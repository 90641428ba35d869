//! Runtime configuration for the Spectral tooling.
//!
//! Priority: explicit CLI arg > env var > built-in default.

use std::path::PathBuf;

/// Default directory holding the persisted collections.
pub const DEFAULT_DATA_DIR: &str = ".spectral";
/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Operator name recorded in audit entries when none is configured.
pub const DEFAULT_OPERATOR: &str = "CISO (demo)";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralConfig {
    /// Directory where the portfolio and policy collections are stored.
    pub data_dir: PathBuf,
    /// `EnvFilter` directive for the log subscriber.
    pub log_filter: String,
    /// Name recorded as the acting user in audit entries.
    pub operator: String,
    /// Seed the demo portfolio and policies when the store is empty.
    pub seed_demo_data: bool,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            seed_demo_data: true,
        }
    }
}

/// Snapshot of the environment variables relevant to configuration.
///
/// Extracted into a struct so tests can inject values without mutating
/// the real process environment (which causes flakes in parallel tests).
#[derive(Debug, Clone, Default)]
pub struct EnvState {
    /// Value of `SPECTRAL_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Value of `SPECTRAL_LOG`.
    pub log_filter: Option<String>,
    /// Value of `SPECTRAL_OPERATOR`.
    pub operator: Option<String>,
    /// `SPECTRAL_NO_SEED` env var is set (any value).
    pub no_seed: bool,
}

impl EnvState {
    /// Read the current process environment.
    pub fn from_env() -> Self {
        Self {
            data_dir: non_empty_var("SPECTRAL_DATA_DIR"),
            log_filter: non_empty_var("SPECTRAL_LOG"),
            operator: non_empty_var("SPECTRAL_OPERATOR"),
            no_seed: std::env::var("SPECTRAL_NO_SEED").is_ok(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub operator: Option<String>,
    pub no_seed: bool,
}

impl SpectralConfig {
    /// Resolve config from CLI overrides and the process environment.
    pub fn resolve(cli: &CliOverrides) -> Self {
        Self::resolve_with(cli, &EnvState::from_env())
    }

    /// Resolve config with an explicit `EnvState` (for testing).
    pub fn resolve_with(cli: &CliOverrides, env: &EnvState) -> Self {
        let defaults = Self::default();

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env.data_dir.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.data_dir);

        let log_filter = cli
            .log_filter
            .clone()
            .or_else(|| env.log_filter.clone())
            .unwrap_or(defaults.log_filter);

        let operator = cli
            .operator
            .clone()
            .or_else(|| env.operator.clone())
            .unwrap_or(defaults.operator);

        Self {
            data_dir,
            log_filter,
            operator,
            seed_demo_data: !(cli.no_seed || env.no_seed),
        }
    }
}
