//! RSS 2.0 / RSS 1.0 / Atom feed parsing into [`BlogPost`]s.

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

use super::models::{post_id, BlogPost};
use super::BlogError;
use crate::xml;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FeedKind {
    Rss,
    Atom,
}

#[derive(Debug, Default)]
struct RawEntry {
    title: String,
    link: Option<String>,
    guid: Option<String>,
    summary: String,
    content: String,
    published: Option<String>,
    updated: Option<String>,
    author: Option<String>,
}

fn append(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

impl RawEntry {
    fn apply(&mut self, kind: FeedKind, parent: &str, field: &str, text: String) {
        match (kind, parent, field) {
            (_, "item" | "entry", "title") => append(&mut self.title, &text),
            (FeedKind::Rss, "item", "link") => self.link = Some(text.trim().to_string()),
            (FeedKind::Rss, "item", "guid") | (FeedKind::Atom, "entry", "id") => {
                self.guid = Some(text.trim().to_string())
            }
            (FeedKind::Rss, "item", "description") | (FeedKind::Atom, "entry", "summary") => {
                append(&mut self.summary, &text)
            }
            (FeedKind::Rss, "item", "encoded") | (FeedKind::Atom, "entry", "content") => {
                append(&mut self.content, &text)
            }
            (FeedKind::Rss, "item", "pubDate") | (FeedKind::Atom, "entry", "published") => {
                self.published = Some(text)
            }
            (FeedKind::Rss, "item", "date") | (FeedKind::Atom, "entry", "updated") => {
                self.updated = Some(text)
            }
            (FeedKind::Rss, "item", "author" | "creator") | (FeedKind::Atom, "author", "name") => {
                if self.author.is_none() {
                    self.author = Some(text.trim().to_string())
                }
            }
            _ => {}
        }
    }

    fn apply_atom_link(&mut self, e: &BytesStart) {
        let rel = xml::attribute(e, "rel");
        if matches!(rel.as_deref(), None | Some("alternate")) && self.link.is_none() {
            self.link = xml::attribute(e, "href");
        }
    }

    fn finish(self, summary_length: usize) -> Option<BlogPost> {
        let title = collapse_whitespace(&strip_markup(&self.title));
        let link = self.link.filter(|l| !l.is_empty());
        if title.is_empty() && link.is_none() {
            return None;
        }

        let key = self
            .guid
            .clone()
            .filter(|g| !g.is_empty())
            .or_else(|| link.clone())
            .unwrap_or_else(|| title.clone());

        let body = if self.summary.trim().is_empty() {
            &self.content
        } else {
            &self.summary
        };

        Some(BlogPost {
            id: post_id(&key),
            title,
            link,
            summary: summarize(body, summary_length),
            author: self.author.filter(|a| !a.is_empty()),
            published: self
                .published
                .as_deref()
                .and_then(parse_date)
                .or_else(|| self.updated.as_deref().and_then(parse_date)),
        })
    }
}

fn block_regex() -> &'static Regex {
    static BLOCKS: OnceLock<Regex> = OnceLock::new();
    BLOCKS.get_or_init(|| {
        Regex::new(r"(?i)<(/?)(p|div|br|li|ul|ol|h[1-6]|tr|td|th|blockquote|pre|hr)\b")
            .expect("valid block tag regex")
    })
}

/// Plain text of an HTML fragment. Script and style content is dropped and
/// block elements are kept apart by a space.
fn strip_markup(html: &str) -> String {
    let spaced = block_regex().replace_all(html, " <$1$2");
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    let cleaned = builder.clean(&spaced).to_string();
    // Entities are decoded by the parser; the serializer re-escapes only these.
    cleaned
        .replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain-text excerpt of an HTML fragment, at most `max_graphemes` long
/// plus an ellipsis when truncated.
pub fn summarize(html: &str, max_graphemes: usize) -> String {
    let text = collapse_whitespace(&strip_markup(html));
    if text.graphemes(true).count() <= max_graphemes {
        return text;
    }
    let truncated: String = text.graphemes(true).take(max_graphemes).collect();
    format!("{}…", truncated.trim_end())
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Parses a feed document, keeping document order.
pub fn parse_feed(body: &str, summary_length: usize) -> Result<Vec<BlogPost>, BlogError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut kind: Option<FeedKind> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut entry: Option<RawEntry> = None;
    let mut posts = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| BlogError::Parse(format!("malformed feed: {}", e)))?;
        match event {
            Event::Start(e) => {
                let name = xml::start_name(&e);
                if kind.is_none() {
                    kind = Some(match name.as_str() {
                        "rss" | "RDF" => FeedKind::Rss,
                        "feed" => FeedKind::Atom,
                        other => {
                            return Err(BlogError::Parse(format!(
                                "unrecognized feed root <{}>",
                                other
                            )))
                        }
                    });
                }
                match name.as_str() {
                    "item" | "entry" if entry.is_none() => entry = Some(RawEntry::default()),
                    "link" if kind == Some(FeedKind::Atom) => {
                        if let Some(entry) = entry.as_mut() {
                            if stack.last().map(String::as_str) == Some("entry") {
                                entry.apply_atom_link(&e);
                            }
                        }
                    }
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = xml::start_name(&e);
                if name == "link" && kind == Some(FeedKind::Atom) {
                    if let Some(entry) = entry.as_mut() {
                        if stack.last().map(String::as_str) == Some("entry") {
                            entry.apply_atom_link(&e);
                        }
                    }
                }
            }
            Event::End(e) => {
                let name = xml::end_name(&e);
                stack.pop();
                if matches!(name.as_str(), "item" | "entry") {
                    if let Some(done) = entry.take() {
                        if let Some(post) = done.finish(summary_length) {
                            posts.push(post);
                        }
                    }
                }
            }
            Event::Text(e) => apply_text(&kind, &stack, &mut entry, xml::text(&e)),
            Event::CData(e) => apply_text(&kind, &stack, &mut entry, xml::cdata(e)),
            Event::Eof => break,
            _ => {}
        }
    }

    if kind.is_none() {
        return Err(BlogError::Parse("empty feed document".to_string()));
    }
    Ok(posts)
}

fn apply_text(
    kind: &Option<FeedKind>,
    stack: &[String],
    entry: &mut Option<RawEntry>,
    text: String,
) {
    let (Some(kind), Some(entry)) = (kind, entry.as_mut()) else {
        return;
    };
    if stack.len() < 2 {
        return;
    }
    let field = &stack[stack.len() - 1];
    let parent = &stack[stack.len() - 2];
    entry.apply(*kind, parent, field, text);
}
