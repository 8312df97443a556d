mod file_config;

pub use file_config::{AquabrowserConfig, BlogConfig, FileConfig, SearchConfig, SummonConfig};

use crate::search::Api;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub libraries_file: Option<PathBuf>,
    pub blog_feed_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub libraries_file: Option<PathBuf>,

    // Feature configs (with defaults)
    pub blog: BlogSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub feed_url: Option<String>,
    pub ttl_sec: u64,
    pub per_page: usize,
    pub summary_length: usize,
    pub timeout_sec: u64,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            feed_url: None,
            ttl_sec: 3600,
            per_page: 5,
            summary_length: 300,
            timeout_sec: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AquabrowserSettings {
    pub base_url: String,
    pub facets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummonSettings {
    pub base_url: String,
    pub access_id: String,
    pub secret_key: String,
    pub facets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub default_api: Api,
    pub page_size: usize,
    pub max_page: usize,
    pub timeout_sec: u64,
    pub facet_limit: usize,
    pub aquabrowser: Option<AquabrowserSettings>,
    pub summon: Option<SummonSettings>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_api: Api::Summon,
            page_size: 20,
            max_page: 50,
            timeout_sec: 15,
            facet_limit: 100,
            aquabrowser: None,
            summon: None,
        }
    }
}

pub fn default_aquabrowser_facets() -> Vec<String> {
    ["format", "language", "author", "subject", "year"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_summon_facets() -> Vec<String> {
    ["ContentType", "SubjectTerms", "Language", "Discipline"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let libraries_file = file
            .libraries_file
            .map(PathBuf::from)
            .or_else(|| cli.libraries_file.clone());
        if let Some(path) = &libraries_file {
            if !path.exists() {
                bail!("Libraries file does not exist: {:?}", path);
            }
        }

        // Blog settings - merge file config with defaults
        let blog_file = file.blog.unwrap_or_default();
        let blog_defaults = BlogSettings::default();
        let blog = BlogSettings {
            feed_url: blog_file
                .feed_url
                .or_else(|| cli.blog_feed_url.clone())
                .filter(|url| !url.trim().is_empty()),
            ttl_sec: blog_file.ttl_sec.unwrap_or(blog_defaults.ttl_sec),
            per_page: blog_file.per_page.unwrap_or(blog_defaults.per_page),
            summary_length: blog_file
                .summary_length
                .unwrap_or(blog_defaults.summary_length),
            timeout_sec: blog_file.timeout_sec.unwrap_or(blog_defaults.timeout_sec),
        };
        if blog.per_page == 0 {
            bail!("blog.per_page must be greater than 0");
        }

        let search = resolve_search(file.search.unwrap_or_default())?;

        Ok(Self {
            port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            libraries_file,
            blog,
            search,
        })
    }
}

fn resolve_search(file: SearchConfig) -> Result<SearchSettings> {
    let defaults = SearchSettings::default();

    let default_api = match file.default_api {
        Some(name) => match name.parse::<Api>() {
            Ok(api) => api,
            Err(_) => bail!("Unknown search.default_api: {:?}", name),
        },
        None => defaults.default_api,
    };

    let page_size = file.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        bail!("search.page_size must be greater than 0");
    }

    let aquabrowser = file.aquabrowser.and_then(|aqua| {
        aqua.base_url.map(|base_url| AquabrowserSettings {
            base_url,
            facets: aqua.facets.unwrap_or_else(default_aquabrowser_facets),
        })
    });

    let summon = match file.summon {
        Some(SummonConfig {
            base_url: Some(base_url),
            access_id,
            secret_key,
            facets,
        }) => match (access_id, secret_key) {
            (Some(access_id), Some(secret_key)) => Some(SummonSettings {
                base_url,
                access_id,
                secret_key,
                facets: facets.unwrap_or_else(default_summon_facets),
            }),
            _ => bail!("search.summon requires both access_id and secret_key"),
        },
        _ => None,
    };

    Ok(SearchSettings {
        default_api,
        page_size,
        max_page: file.max_page.unwrap_or(defaults.max_page),
        timeout_sec: file.timeout_sec.unwrap_or(defaults.timeout_sec),
        facet_limit: file.facet_limit.unwrap_or(defaults.facet_limit),
        aquabrowser,
        summon,
    })
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
