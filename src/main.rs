use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use library_finder::config::{AppConfig, CliConfig, FileConfig};
use library_finder::{
    create_blog_cache, create_search_proxy, run_server, LibraryDirectory, RequestsLoggingLevel,
    ServerConfig,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML configuration file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of cacheable responses in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Path to the JSON file listing the libraries shown on the map.
    #[clap(long, value_parser = parse_path)]
    pub libraries_file: Option<PathBuf>,

    /// URL of the RSS or Atom feed shown on the news pages.
    #[clap(long)]
    pub blog_feed_url: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            logging_level: self.logging_level.clone(),
            content_cache_age_sec: self.content_cache_age_sec,
            frontend_dir_path: self.frontend_dir_path.clone(),
            libraries_file: self.libraries_file.clone(),
            blog_feed_url: self.blog_feed_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let search_proxy = Arc::new(create_search_proxy(&config.search)?);
    info!("Search APIs enabled: {:?}", search_proxy.enabled_apis());

    let blog = create_blog_cache(&config.blog)?.map(Arc::new);

    let libraries = match &config.libraries_file {
        Some(path) => LibraryDirectory::load(path)?,
        None => {
            info!("No libraries file configured, the library directory is empty");
            LibraryDirectory::empty()
        }
    };

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
        content_cache_age_sec: config.content_cache_age_sec,
        frontend_dir_path: config.frontend_dir_path,
    };

    info!("Ready to serve at port {}!", server_config.port);
    run_server(server_config, search_proxy, blog, Arc::new(libraries)).await
}
