//! Link extraction from fetched HTML
//!
//! Finds every `<a href>` in a document and keeps the links that stay inside
//! the crawled site, turning relative forms into absolute URLs.

use crate::url::{classify_link, LinkKind};
use scraper::{Html, Selector};
use url::Url;

/// Extracts the followable links from an HTML document
///
/// # Link Rules
///
/// | `href` form | Result |
/// |-------------|--------|
/// | `//host/path` containing the base host | base scheme + link |
/// | `/path` | base scheme and host + link |
/// | absolute, containing the base host anywhere | kept as-is |
/// | anything else | dropped |
///
/// Links that cannot be parsed, or that resolve to something other than
/// `http`/`https`, are dropped. Results keep document order and may contain
/// duplicates. Malformed HTML only ever reduces the number of matches.
///
/// # Arguments
///
/// * `base_url` - The URL the document was fetched from
/// * `html` - The document text
///
/// # Example
///
/// ```
/// use webtree::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("http://example.com").unwrap();
/// let html = r#"<a href="/wiki">Wiki</a><a href="http://other.org/">Other</a>"#;
/// let links = extract_links(&base, html);
/// assert_eq!(links, vec![Url::parse("http://example.com/wiki").unwrap()]);
/// ```
pub fn extract_links(base_url: &Url, html: &str) -> Vec<Url> {
    let Some(host) = base_url.host_str() else {
        return Vec::new();
    };

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let links: Vec<Url> = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url, host))
        .collect();

    tracing::info!("{}: found {} links", base_url, links.len());

    links
}

/// Turns one raw `href` into an absolute URL, or drops it
fn resolve_link(href: &str, base_url: &Url, host: &str) -> Option<Url> {
    let resolved = match classify_link(href, host) {
        LinkKind::ProtocolRelative | LinkKind::RootRelative => base_url.join(href),
        LinkKind::SameDomain => Url::parse(href),
        LinkKind::External => {
            tracing::trace!("dropped external link: {}", href);
            return None;
        }
    };

    match resolved {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(url) => {
            tracing::trace!("dropped link with unsupported scheme: {}", url);
            None
        }
        Err(e) => {
            tracing::trace!("dropped malformed link {}: {}", href, e);
            None
        }
    }
}
