//! Library Finder server library
//!
//! Exposes the internal modules for the binary and for end-to-end tests.

pub mod blog;
pub mod config;
pub mod http;
pub mod libraries;
pub mod paging;
pub mod search;
pub mod server;
pub mod xml;

// Re-export commonly used types for convenience
pub use blog::{create_blog_cache, BlogCache};
pub use libraries::LibraryDirectory;
pub use search::{create_search_proxy, SearchProxy};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
