use crate::config::MapperConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "graph-mapper")]
#[command(about = "Runs the graph-mapper sample scenarios")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with a [mapper] table")]
    pub config: Option<String>,

    #[arg(long, help = "Disable cycle detection")]
    pub no_cycle_detection: bool,

    #[arg(long, help = "Override the maximum mapping depth")]
    pub max_depth: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// File settings first, then command-line overrides.
    pub fn mapper_config(&self) -> Result<MapperConfig> {
        let mut config = match &self.config {
            Some(path) => MapperConfig::from_file(path)?,
            None => MapperConfig::default(),
        };

        if self.no_cycle_detection {
            config.handle_circular_references = false;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let cli = CliConfig::parse_from(["graph-mapper", "--no-cycle-detection", "--max-depth", "9"]);
        assert!(cli.validate().is_ok());

        let config = cli.mapper_config().unwrap();
        assert!(!config.handle_circular_references);
        assert_eq!(config.max_depth, 9);
    }

    #[test]
    fn test_zero_depth_override_is_rejected() {
        let cli = CliConfig::parse_from(["graph-mapper", "--max-depth", "0"]);
        assert!(cli.mapper_config().is_err());
    }

    #[test]
    fn test_empty_config_path_is_rejected() {
        let cli = CliConfig::parse_from(["graph-mapper", "--config", ""]);
        assert!(cli.validate().is_err());
    }
}
