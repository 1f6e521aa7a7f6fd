//! CLI configuration file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use u_cutstock::worker::PoolConfig;
use u_cutstock::EngineConfig;

/// Settings loaded from `--config <file.toml>`.
///
/// ```toml
/// [pool]
/// min_workers = 1
/// max_workers = 4
/// task_timeout_ms = 60000
///
/// [engine]
/// use_pool = true
///
/// [engine.linear]
/// algorithm = "FFD"
/// kerf = 3.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub pool: PoolConfig,
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Loads the file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.pool.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_cutstock::d1::Algorithm1D;
    use u_cutstock::d2::Heuristic;

    #[test]
    fn test_parse_full() {
        let config = CliConfig::parse(
            r#"
            [pool]
            min_workers = 2
            max_workers = 4
            task_timeout_ms = 1500

            [engine]
            use_pool = false

            [engine.linear]
            algorithm = "FFD"
            kerf = 3.0
            minUsableWaste = 250.0

            [engine.sheet]
            heuristic = "BAF"
            allHeuristics = true
            "#,
        )
        .unwrap();

        assert_eq!(config.pool.min_workers, 2);
        assert_eq!(config.pool.max_workers, 4);
        assert_eq!(config.pool.task_timeout_ms, 1500);
        assert!(!config.engine.use_pool);
        assert_eq!(config.engine.linear.algorithm, Algorithm1D::Ffd);
        assert_eq!(config.engine.linear.min_usable_waste, 250.0);
        assert_eq!(config.engine.sheet.heuristic, Heuristic::Baf);
        assert!(config.engine.sheet.all_heuristics);
        assert!(config.engine.sheet.allow_rotation);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(CliConfig::parse("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_invalid_pool_rejected() {
        let err = CliConfig::parse("[pool]\nmin_workers = 5\nmax_workers = 2\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/cutstock.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cutstock.toml"));
    }
}
