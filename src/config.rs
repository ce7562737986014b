use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RstdocError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source tree and output locations
    pub project: ProjectConfig,

    /// Sweep pacing and file selection
    pub scan: ScanConfig,

    /// Rendered document settings
    pub output: OutputConfig,

    /// Help system integration
    pub help: HelpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Root of the source tree; logical path "/" maps here
    pub source_root: PathBuf,

    /// Documentation output directory
    pub docs_dir: PathBuf,

    /// Where the scan watermark is persisted
    pub state_file: PathBuf,

    /// Usage document copied next to the indices, relative to the source root
    pub usage_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Work units performed per tick
    pub burst_size: usize,

    /// Cooperative delay between ticks
    pub tick_delay_ms: u64,

    /// Interval of the periodic background sweep
    pub sweep_interval_secs: u64,

    /// Extension of files that carry documentation tags
    pub source_extension: String,

    /// Logical directories never descended into
    pub excluded_dirs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Version string embedded in every document footer
    pub generator_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// File touched after every completed sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuild_marker: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("lib"),
            docs_dir: PathBuf::from("docs/autodoc"),
            state_file: PathBuf::from(".rstdoc/state.json"),
            usage_file: PathBuf::from("USAGE"),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            burst_size: 10,
            tick_delay_ms: 1000,
            sweep_interval_secs: 86_000,
            source_extension: "c".to_string(),
            excluded_dirs: [
                "/data/", "/ftp/", "/help/", "/include/", "/log/", "/open/", "/tmp/", "/user/",
                "/wiz/", "/contrib/",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generator_version: format!("rstdoc {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| RstdocError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| RstdocError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["Rstdoc.toml", "rstdoc.toml", ".rstdoc.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.burst_size == 0 {
            return Err(RstdocError::Config(
                "scan.burst_size must be at least 1".to_string(),
            ));
        }
        if self.scan.source_extension.is_empty() {
            return Err(RstdocError::Config(
                "scan.source_extension must not be empty".to_string(),
            ));
        }
        for dir in &self.scan.excluded_dirs {
            if !dir.starts_with('/') || !dir.ends_with('/') {
                return Err(RstdocError::Config(format!(
                    "excluded directory '{}' must look like '/name/'",
                    dir
                )));
            }
        }
        Ok(())
    }
}
