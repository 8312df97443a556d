use axum::extract::FromRef;

use crate::blog::BlogCache;
use crate::libraries::LibraryDirectory;
use crate::search::SearchProxy;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSearchProxy = Arc<SearchProxy>;
pub type OptionalBlogCache = Option<Arc<BlogCache>>;
pub type GuardedLibraryDirectory = Arc<LibraryDirectory>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub search_proxy: GuardedSearchProxy,
    pub blog: OptionalBlogCache,
    pub libraries: GuardedLibraryDirectory,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        search_proxy: GuardedSearchProxy,
        blog: OptionalBlogCache,
        libraries: GuardedLibraryDirectory,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_string(),
            search_proxy,
            blog,
            libraries,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedSearchProxy {
    fn from_ref(input: &ServerState) -> Self {
        input.search_proxy.clone()
    }
}

impl FromRef<ServerState> for OptionalBlogCache {
    fn from_ref(input: &ServerState) -> Self {
        input.blog.clone()
    }
}

impl FromRef<ServerState> for GuardedLibraryDirectory {
    fn from_ref(input: &ServerState) -> Self {
        input.libraries.clone()
    }
}
