#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{MapperError, Result};
use crate::utils::validation::{validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Highest accepted `max_depth`. A depth error drops a partial copy that deep, and
/// `Rc` chains are freed recursively.
pub const MAX_DEPTH_LIMIT: usize = 2_048;

/// Mapper behaviour switches, loadable from a `[mapper]` TOML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// When false, no identities are recorded: shared objects are mapped again at
    /// every occurrence and a true cycle ends in a depth error. This switches cycle
    /// detection off entirely rather than only dropping the shared set.
    pub handle_circular_references: bool,
    /// Nesting bound for untracked traversals. Tracked traversals cannot loop and
    /// run at any depth.
    pub max_depth: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            handle_circular_references: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mapper: MapperConfig,
}

impl MapperConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapperError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a document whose `[mapper]` table holds the settings. `${VAR}`
    /// references are replaced from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let file: ConfigFile =
            toml::from_str(&processed_content).map_err(|e| MapperError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        file.mapper.validate()?;
        Ok(file.mapper)
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapperError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for MapperConfig {
    fn validate(&self) -> Result<()> {
        validate_range("mapper.max_depth", self.max_depth, 1, MAX_DEPTH_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert!(config.handle_circular_references);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_mapper_table() {
        let toml_content = r#"
[mapper]
handle_circular_references = false
max_depth = 32
"#;

        let config = MapperConfig::from_toml_str(toml_content).unwrap();
        assert!(!config.handle_circular_references);
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = MapperConfig::from_toml_str("").unwrap();
        assert_eq!(config, MapperConfig::default());

        let config = MapperConfig::from_toml_str("[mapper]\nmax_depth = 8\n").unwrap();
        assert!(config.handle_circular_references);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GRAPH_MAPPER_TEST_DEPTH", "12");

        let toml_content = r#"
[mapper]
max_depth = ${GRAPH_MAPPER_TEST_DEPTH}
"#;

        let config = MapperConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.max_depth, 12);

        std::env::remove_var("GRAPH_MAPPER_TEST_DEPTH");
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        let err = MapperConfig::from_toml_str("[mapper]\nmax_depth = 0\n").unwrap_err();
        assert!(matches!(err, MapperError::InvalidConfigValueError { .. }));

        let err = MapperConfig::from_toml_str("[mapper]\nmax_depth = 65536\n").unwrap_err();
        assert!(matches!(err, MapperError::InvalidConfigValueError { .. }));

        let config = MapperConfig::from_toml_str("[mapper]\nmax_depth = 2048\n").unwrap();
        assert_eq!(config.max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_malformed_toml() {
        let err = MapperConfig::from_toml_str("[mapper\nmax_depth = 1").unwrap_err();
        assert!(matches!(err, MapperError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[mapper]\nhandle_circular_references = true\nmax_depth = 64\n")
            .unwrap();

        let config = MapperConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.max_depth, 64);
    }
}
