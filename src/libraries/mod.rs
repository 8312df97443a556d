//! Library locations shown on the map.

mod models;
mod store;

pub use models::{Coordinates, Library, LibraryListing};
pub use store::LibraryDirectory;
