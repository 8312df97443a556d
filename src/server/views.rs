//! Server-rendered HTML pages.
//!
//! Pages are assembled from small string fragments; every value that comes
//! from a request or an upstream service goes through [`escape`].

use axum::http::StatusCode;

use crate::blog::BlogPost;
use crate::paging::Page;
use crate::search::{AggregatedResults, BackendSection, ErrorBody, SearchRecord, SearchResults};

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escaped link target, or `None` unless it is an absolute http(s) URL.
fn safe_href(raw: &str) -> Option<String> {
    let url = reqwest::Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| escape(url.as_str()))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Builds `path?query` from `params` with the page parameter set to `page`.
fn page_link(path: &str, params: &[(String, String)], page: usize) -> String {
    let mut query: Vec<String> = params
        .iter()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();
    query.push(format!("page={}", page));
    format!("{}?{}", path, query.join("&"))
}

fn pager(path: &str, params: &[(String, String)], page: usize, total_pages: usize) -> String {
    let mut links = Vec::new();
    if page > 1 {
        links.push(format!(
            "<a rel=\"prev\" href=\"{}\">Previous</a>",
            escape(&page_link(path, params, page - 1))
        ));
    }
    links.push(format!("<span>Page {} of {}</span>", page, total_pages));
    if page < total_pages {
        links.push(format!(
            "<a rel=\"next\" href=\"{}\">Next</a>",
            escape(&page_link(path, params, page + 1))
        ));
    }
    format!("<nav class=\"pager\">{}</nav>", links.join(" "))
}

fn search_form(query: &str) -> String {
    format!(
        "<form action=\"/search\" method=\"get\">\
         <input type=\"search\" name=\"q\" value=\"{}\">\
         <button type=\"submit\">Search</button></form>",
        escape(query)
    )
}

fn render_record(record: &SearchRecord) -> String {
    let title = match record.link.as_deref().and_then(safe_href) {
        Some(href) => format!("<a href=\"{}\">{}</a>", href, escape(&record.title)),
        None => escape(&record.title),
    };
    let mut details = Vec::new();
    if !record.authors.is_empty() {
        details.push(escape(&record.authors.join("; ")));
    }
    if let Some(format) = &record.format {
        details.push(escape(format));
    }
    if let Some(year) = &record.year {
        details.push(escape(year));
    }
    let thumbnail = record
        .thumbnail
        .as_deref()
        .and_then(safe_href)
        .map(|src| format!("<img src=\"{}\" alt=\"\">", src))
        .unwrap_or_default();
    format!(
        "<li>{}<div class=\"title\">{}</div><div class=\"details\">{}</div></li>",
        thumbnail,
        title,
        details.join(" &middot; ")
    )
}

fn render_results(results: &SearchResults) -> String {
    if results.records.is_empty() {
        return "<p>No results.</p>".to_string();
    }
    let records: String = results.records.iter().map(render_record).collect();
    format!("<p>{} results</p><ol>{}</ol>", results.total, records)
}

fn render_section(section: &BackendSection) -> String {
    let content = match (&section.results, &section.error) {
        (Some(results), _) => render_results(results),
        (None, Some(error)) => format!(
            "<p class=\"error\">This source is unavailable ({}): {}</p>",
            error.code,
            escape(&error.msg)
        ),
        (None, None) => String::new(),
    };
    format!(
        "<section class=\"source\" id=\"{}\"><h2>{}</h2>{}</section>",
        section.api,
        section.api,
        content
    )
}

/// Pages reachable from an aggregated search: the deepest section, capped at
/// `max_page` since the proxy clamps anything beyond it.
fn aggregated_total_pages(results: &AggregatedResults, max_page: usize) -> usize {
    results
        .sections
        .iter()
        .filter_map(|section| section.results.as_ref())
        .map(SearchResults::total_pages)
        .max()
        .unwrap_or(1)
        .min(max_page.max(1))
}

/// The aggregated results page. `results` is `None` when no query was given.
///
/// Every section is queried with the same page, so a single pager drives them all.
pub fn search_page(
    query: &str,
    results: Option<&AggregatedResults>,
    params: &[(String, String)],
    max_page: usize,
) -> String {
    let mut body = format!("<h1>Search the library</h1>{}", search_form(query));
    if let Some(results) = results {
        if results.sections.is_empty() {
            body.push_str("<p>No search sources are configured.</p>");
        }
        for section in &results.sections {
            body.push_str(&render_section(section));
        }
        if results.sections.iter().any(|s| s.results.is_some()) {
            let total_pages = aggregated_total_pages(results, max_page);
            body.push_str(&pager("/search", params, results.page, total_pages));
        }
    }
    let title = if query.is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {}", query)
    };
    layout(&title, &body)
}

fn render_post_meta(post: &BlogPost) -> String {
    let mut meta = Vec::new();
    if let Some(author) = &post.author {
        meta.push(escape(author));
    }
    if let Some(published) = &post.published {
        meta.push(format!(
            "<time datetime=\"{}\">{}</time>",
            published.to_rfc3339(),
            published.format("%e %B %Y").to_string().trim()
        ));
    }
    format!("<p class=\"meta\">{}</p>", meta.join(" &middot; "))
}

pub fn blog_page(page: &Page<BlogPost>) -> String {
    let mut body = String::from("<h1>News</h1>");
    if page.items.is_empty() {
        body.push_str("<p>No posts yet.</p>");
    }
    for post in &page.items {
        body.push_str(&format!(
            "<article><h2><a href=\"/blog/{}\">{}</a></h2>{}<p>{}</p></article>",
            escape(&post.id),
            escape(&post.title),
            render_post_meta(post),
            escape(&post.summary)
        ));
    }
    body.push_str(&pager("/blog", &[], page.page, page.total_pages));
    layout("News", &body)
}

pub fn blog_post(post: &BlogPost) -> String {
    let original = post
        .link
        .as_deref()
        .and_then(safe_href)
        .map(|href| format!("<p><a href=\"{}\">Read the full post</a></p>", href))
        .unwrap_or_default();
    let body = format!(
        "<article><h1>{}</h1>{}<p>{}</p>{}</article><p><a href=\"/blog\">All news</a></p>",
        escape(&post.title),
        render_post_meta(post),
        escape(&post.summary),
        original
    );
    layout(&post.title, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1><p>{}</p>",
        status.as_u16(),
        escape(reason),
        escape(message)
    );
    layout(reason, &body)
}

/// Error page for a failed search, using the error body's code and message.
pub fn search_error_page(query: &str, error: &ErrorBody) -> String {
    let body = format!(
        "<h1>Search the library</h1>{}<p class=\"error\">Search failed ({}): {}</p>",
        search_form(query),
        error.code,
        escape(&error.msg)
    );
    layout("Search", &body)
}
