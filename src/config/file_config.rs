use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    pub libraries_file: Option<String>,

    // Feature configs
    pub blog: Option<BlogConfig>,
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct BlogConfig {
    pub feed_url: Option<String>,
    pub ttl_sec: Option<u64>,
    pub per_page: Option<usize>,
    pub summary_length: Option<usize>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// API used when a request carries no `api` flag: "aquabrowser" or "summon"
    pub default_api: Option<String>,
    pub page_size: Option<usize>,
    pub max_page: Option<usize>,
    pub timeout_sec: Option<u64>,
    /// Number of values fetched by the facet endpoint
    pub facet_limit: Option<usize>,
    pub aquabrowser: Option<AquabrowserConfig>,
    pub summon: Option<SummonConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AquabrowserConfig {
    pub base_url: Option<String>,
    pub facets: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SummonConfig {
    pub base_url: Option<String>,
    pub access_id: Option<String>,
    pub secret_key: Option<String>,
    pub facets: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
