use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::models::{Coordinates, Library, LibraryListing};

/// In-memory set of libraries, loaded once at startup.
#[derive(Debug, Default)]
pub struct LibraryDirectory {
    libraries: Vec<Library>,
}

impl LibraryDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_libraries(libraries: Vec<Library>) -> Result<Self> {
        let mut seen = HashSet::new();
        for library in &libraries {
            if library.id.trim().is_empty() {
                bail!("Library {:?} has an empty id", library.name);
            }
            if !seen.insert(library.id.as_str()) {
                bail!("Duplicate library id: {}", library.id);
            }
            if !library.location.is_valid() {
                bail!(
                    "Library {} has invalid coordinates ({}, {})",
                    library.id,
                    library.location.lat,
                    library.location.lng
                );
            }
        }
        Ok(Self { libraries })
    }

    /// Reads a JSON array of libraries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read libraries file: {:?}", path))?;
        let libraries: Vec<Library> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse libraries file: {:?}", path))?;
        let directory = Self::from_libraries(libraries)?;
        info!("Loaded {} libraries from {:?}", directory.len(), path);
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// File order, or nearest first when `near` is given.
    pub fn list(&self, near: Option<Coordinates>) -> Vec<LibraryListing> {
        let mut listings: Vec<LibraryListing> = self
            .libraries
            .iter()
            .map(|library| LibraryListing {
                library: library.clone(),
                distance_km: near.map(|point| point.distance_km(&library.location)),
            })
            .collect();

        if near.is_some() {
            listings.sort_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
            });
        }
        listings
    }

    pub fn get(&self, id: &str) -> Option<&Library> {
        self.libraries.iter().find(|library| library.id == id)
    }
}
