use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub link: Option<String>,
    pub summary: String,
    pub author: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

/// Derives a short, URL-safe identifier from a feed's own entry key.
///
/// Feed guids are frequently URLs or `tag:` URIs, which do not fit in a
/// path segment.
pub fn post_id(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}
