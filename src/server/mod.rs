mod blog;
pub mod config;
mod errors;
mod http_layers;
mod libraries;
mod search;
pub mod server;
pub mod state;
mod views;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
