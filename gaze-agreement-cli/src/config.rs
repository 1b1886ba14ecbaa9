//! Batch configuration loading and parsing

use anyhow::{Context, Result};
use gaze_agreement::AgreementConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Batch configuration (loaded from a TOML file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub roster: RosterConfig,
    pub coding: CodingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AgreementConfig,
}

/// Participant roster (CSV with a header row)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    pub path: PathBuf,
    /// Column holding the annotation file name shared by both codings
    #[serde(default = "default_coding_column")]
    pub coding_column: String,
}

fn default_coding_column() -> String {
    "CodingFilename1".to_string()
}

/// Where the two codings of each session live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodingConfig {
    /// Reference codings (usually human); these define the active window
    pub base_dir: PathBuf,
    /// Codings compared against the reference (usually automated)
    pub comparison_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Roster copy with agreement columns appended
    pub path: PathBuf,
}

impl AppConfig {
    /// Resolve relative paths against `base`
    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.roster.path,
            &mut self.coding.base_dir,
            &mut self.coding.comparison_dir,
            &mut self.output.path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }

    config
        .analysis
        .validate()
        .with_context(|| format!("Invalid [analysis] section in {:?}", path))?;

    Ok(config)
}

/// Apply command-line overrides on top of the configured analysis settings
pub fn apply_overrides(
    analysis: &mut AgreementConfig,
    block_size: Option<u64>,
    header_lines: Option<usize>,
) {
    if let Some(block_size) = block_size {
        analysis.block_size_ms = block_size;
    }
    if let Some(header_lines) = header_lines {
        analysis.header_lines = header_lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [roster]
            path = "participants.csv"

            [coding]
            base_dir = "coding/human"
            comparison_dir = "coding/auto"

            [output]
            path = "participants_comparison.csv"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.roster.coding_column, "CodingFilename1");
        assert_eq!(config.analysis, AgreementConfig::default());
        assert_eq!(config.coding.comparison_dir, PathBuf::from("coding/auto"));
    }

    #[test]
    fn test_analysis_overrides() {
        let toml_content = r#"
            [roster]
            path = "participants.csv"
            coding_column = "CodingFile"

            [coding]
            base_dir = "human"
            comparison_dir = "auto"

            [output]
            path = "out.csv"

            [analysis]
            block_size_ms = 500
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.roster.coding_column, "CodingFile");
        assert_eq!(config.analysis.block_size_ms, 500);
        assert_eq!(config.analysis.header_lines, 3);
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("batch.toml");
        fs::write(
            &config_path,
            r#"
            [roster]
            path = "participants.csv"

            [coding]
            base_dir = "/data/human"
            comparison_dir = "auto"

            [output]
            path = "out.csv"
            "#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.roster.path, dir.path().join("participants.csv"));
        assert_eq!(config.coding.base_dir, PathBuf::from("/data/human"));
        assert_eq!(config.coding.comparison_dir, dir.path().join("auto"));
    }

    #[test]
    fn test_load_rejects_zero_block_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("batch.toml");
        fs::write(
            &config_path,
            r#"
            [roster]
            path = "participants.csv"
            [coding]
            base_dir = "human"
            comparison_dir = "auto"
            [output]
            path = "out.csv"
            [analysis]
            block_size_ms = 0
            "#,
        )
        .unwrap();

        assert!(load_config(&config_path).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut analysis = AgreementConfig::default();
        apply_overrides(&mut analysis, Some(250), None);
        assert_eq!(analysis.block_size_ms, 250);
        assert_eq!(analysis.header_lines, 3);
    }
}
