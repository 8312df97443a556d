mod aquabrowser;
mod backend;
mod factory;
mod models;
mod proxy;
mod query;
mod summon;

pub use aquabrowser::AquabrowserBackend;
pub use backend::{SearchBackend, SearchError};
pub use factory::create_search_proxy;
pub use models::*;
pub use proxy::SearchProxy;
pub use query::{sanitize_params, select_api, QueryLimits, API_PARAM, PAGE_PARAM, QUERY_PARAM};
pub use summon::{summon_digest, SummonBackend};
