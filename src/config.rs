use crate::error::Result;
use crate::platform::FallbackStrategy;
use crate::scope::{RegionScope, ScopeFilter};
use crate::types::Platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE: &str = "ca-ranking.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub scope: ScopeConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: String,
    pub preview_rows: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScopeConfig {
    pub year1: i32,
    pub year2: i32,
    pub platforms: Vec<Platform>,
    pub region: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub fallback: FallbackStrategy,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[input]
path = "transactions.csv"

[output]
dir = "reports"
preview_rows = 5

[scope]
year1 = 2024
year2 = 2025
platforms = ["acr", "dca", "exadis", "alliance"]
region = "all"

[classifier]
fallback = "row_index"
"#;

impl Config {
    pub fn scope_filter(&self) -> ScopeFilter {
        ScopeFilter::new(
            self.scope.platforms.iter().copied(),
            RegionScope::from_selection(&self.scope.region),
        )
    }
}

/// Load configuration.
///
/// Search order:
/// 1. The explicit path, if given
/// 2. `ca-ranking.toml` in the working directory
/// 3. The embedded default
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let candidate: Option<PathBuf> = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            local.exists().then_some(local)
        }
    };

    if let Some(config_path) = candidate {
        tracing::info!("Loading config from: {}", config_path.display());
        let contents = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        return Ok(config);
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_loads() {
        let config: std::result::Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.scope.year1, 2024);
        assert_eq!(config.scope.year2, 2025);
        assert_eq!(config.classifier.fallback, FallbackStrategy::RowIndex);
        assert!(config.scope_filter().all_platforms());
        assert_eq!(config.scope_filter().region, RegionScope::All);
    }

    #[test]
    fn test_explicit_file_overrides_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[input]
path = "data/ca.csv"

[output]
dir = "out"
preview_rows = 3

[scope]
year1 = 2023
year2 = 2024
platforms = ["dca"]
region = "Nord"

[classifier]
fallback = "stable_hash"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.input.path, "data/ca.csv");
        assert_eq!(config.classifier.fallback, FallbackStrategy::StableHash);
        let scope = config.scope_filter();
        assert!(!scope.all_platforms());
        assert!(scope.platforms.contains(&Platform::Dca));
        assert_eq!(scope.region, RegionScope::Only("Nord".to_string()));
    }

    #[test]
    fn test_missing_classifier_section_uses_row_index() {
        let config: Config = toml::from_str(
            r#"
[input]
path = "a.csv"
[output]
dir = "out"
preview_rows = 1
[scope]
year1 = 2024
year2 = 2025
platforms = []
region = "all"
"#,
        )
        .unwrap();
        assert_eq!(config.classifier.fallback, FallbackStrategy::RowIndex);
    }
}
