//! Test fixtures: upstream documents and the libraries file
#![allow(dead_code)]

use super::constants::*;
use httpmock::prelude::*;
use httpmock::Mock;
use std::io::Write;
use tempfile::NamedTempFile;

pub const AQUABROWSER_RESULTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <meta><count>2</count></meta>
  <results>
    <record extID="aqua-1">
      <d>
        <title>Maps of the Netherlands</title>
        <author>Kuiper, Anna</author>
        <format>Book</format>
        <year>1998</year>
        <link>https://catalog.example.edu/record/aqua-1</link>
      </d>
    </record>
    <record extID="aqua-2">
      <d>
        <title><![CDATA[Cartography & Society]]></title>
        <format>eBook</format>
      </d>
    </record>
  </results>
  <facets>
    <facet name="format">
      <value count="1">Book</value>
      <value count="1">eBook</value>
    </facet>
  </facets>
</root>"#;

pub const SUMMON_RESULTS: &str = r#"{
    "recordCount": 57,
    "documents": [
        {
            "ID": ["summon-1"],
            "Title": ["Atlas of Europe"],
            "Author": ["Jansen, Piet"],
            "ContentType": ["Book"],
            "PublicationYear": ["2015"],
            "link": "https://example.summon.serialssolutions.com/link/0/summon-1"
        }
    ],
    "facetFields": [
        {
            "displayName": "ContentType",
            "counts": [
                {"value": "Book", "count": 40},
                {"value": "Journal Article", "count": 17}
            ]
        }
    ]
}"#;

/// RSS document with `BLOG_POST_COUNT` items, newest first.
pub fn blog_feed() -> String {
    let items: String = (1..=BLOG_POST_COUNT)
        .rev()
        .map(|n| {
            format!(
                "<item>\
                   <title>News item {n}</title>\
                   <link>https://news.example.edu/posts/{n}</link>\
                   <guid>news-{n}</guid>\
                   <description>&lt;p&gt;Body of item {n}&lt;/p&gt;</description>\
                   <pubDate>0{n} Apr 2024 10:00:00 +0000</pubDate>\
                 </item>",
                n = n
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>News</title>{}</channel></rss>",
        items
    )
}

pub const LIBRARIES_JSON: &str = r#"[
    {
        "id": "ub-city",
        "name": "University Library City Centre",
        "location": { "lat": 52.3676, "lng": 4.9041 },
        "address": "Singel 425, Amsterdam",
        "url": "https://library.example.edu/city",
        "opening_hours": ["Mon-Fri 08:30-24:00", "Sat-Sun 09:30-18:00"]
    },
    {
        "id": "science-park",
        "name": "Science Park Library",
        "location": { "lat": 52.3546, "lng": 4.9556 },
        "phone": "+31 20 000 0000"
    },
    {
        "id": "utrecht",
        "name": "Utrecht Branch",
        "location": { "lat": 52.0907, "lng": 5.1214 }
    }
]"#;

/// Writes the libraries fixture to a temporary file.
pub fn create_libraries_file() -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(LIBRARIES_JSON.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Answers every Aquabrowser search with `AQUABROWSER_RESULTS`.
pub async fn mock_aquabrowser(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{}/result.ashx", AQUABROWSER_BASE_PATH))
                .query_param("output", "xml");
            then.status(200)
                .header("Content-Type", "text/xml")
                .body(AQUABROWSER_RESULTS);
        })
        .await
}

/// Answers every signed Summon search with `SUMMON_RESULTS`.
pub async fn mock_summon(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{}/2.0.0/search", SUMMON_BASE_PATH))
                .header_exists("authorization")
                .header_exists("x-summon-date");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(SUMMON_RESULTS);
        })
        .await
}

pub async fn mock_blog_feed(server: &MockServer) -> Mock<'_> {
    let feed = blog_feed();
    server
        .mock_async(|when, then| {
            when.method(GET).path(BLOG_FEED_PATH);
            then.status(200)
                .header("Content-Type", "application/rss+xml")
                .body(feed);
        })
        .await
}
