//! Factory function for creating the search proxy from configuration

use super::{AquabrowserBackend, QueryLimits, SearchProxy, SummonBackend};
use crate::config::SearchSettings;
use crate::http::create_client;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Create a search proxy with a backend for every configured API
///
/// # Arguments
/// * `settings` - Resolved search settings
///
/// # Returns
/// A proxy that may have zero, one or two backends
pub fn create_search_proxy(settings: &SearchSettings) -> Result<SearchProxy> {
    let client = create_client(settings.timeout_sec)?;
    let limits = QueryLimits {
        page_size: settings.page_size,
        max_page: settings.max_page,
    };
    let mut proxy = SearchProxy::new(settings.default_api, limits);

    if let Some(aqua) = &settings.aquabrowser {
        info!("Creating Aquabrowser backend at {}", aqua.base_url);
        proxy = proxy.with_backend(Arc::new(AquabrowserBackend::new(
            client.clone(),
            &aqua.base_url,
            aqua.facets.clone(),
        )));
    }

    if let Some(summon) = &settings.summon {
        info!("Creating Summon backend at {}", summon.base_url);
        proxy = proxy.with_backend(Arc::new(SummonBackend::new(
            client,
            &summon.base_url,
            summon.access_id.clone(),
            summon.secret_key.clone(),
            summon.facets.clone(),
            settings.facet_limit,
        )?));
    }

    if !proxy.enabled_apis().contains(&settings.default_api) {
        warn!(
            "Default search API {} is not configured, requests without an api flag will fail",
            settings.default_api
        );
    }

    Ok(proxy)
}
