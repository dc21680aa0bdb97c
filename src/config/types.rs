use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sumi-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Configuration saving below `root_dir`, following links `max_depth` deep
    pub fn new(root_dir: impl Into<PathBuf>, max_depth: u32) -> Self {
        Self {
            crawler: CrawlerConfig {
                max_depth,
                ..CrawlerConfig::default()
            },
            output: OutputConfig {
                root_dir: root_dir.into(),
            },
        }
    }

    /// Timeout applied to every single request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed page (0 saves only the seed)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Storage root; every site gets a folder below it
    #[serde(rename = "root-dir", default = "default_root_dir")]
    pub root_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("pages")
}
