//! URL handling module for Webtree
//!
//! This module provides root URL validation, host extraction and the
//! same-domain link classification used by the extractor.

use crate::{UrlError, UrlResult};
use url::Url;

/// How a raw `href` value relates to the page it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `//host/path`, needs the base scheme
    ProtocolRelative,
    /// `/path`, needs the base scheme and host
    RootRelative,
    /// Absolute link mentioning the base host somewhere in its text
    SameDomain,
    /// Anything else - never followed
    External,
}

impl LinkKind {
    /// Returns true if links of this kind should be followed
    pub fn is_followed(&self) -> bool {
        !matches!(self, Self::External)
    }
}

/// Classifies a raw link relative to the host of the page it came from
///
/// Same-domain detection is a plain substring test on the link text: any link
/// containing `host` anywhere counts, so `http://notexample.com.evil.org`
/// matches host `example.com`. Protocol-relative links must pass the same
/// test, root-relative links always pass.
///
/// # Examples
///
/// ```
/// use webtree::url::{classify_link, LinkKind};
///
/// assert_eq!(classify_link("/wiki", "example.com"), LinkKind::RootRelative);
/// assert_eq!(classify_link("//example.com/a", "example.com"), LinkKind::ProtocolRelative);
/// assert_eq!(classify_link("//other.org/a", "example.com"), LinkKind::External);
/// assert_eq!(classify_link("https://example.com/a", "example.com"), LinkKind::SameDomain);
/// assert_eq!(classify_link("https://example1.com/", "example.com"), LinkKind::External);
/// ```
pub fn classify_link(link: &str, host: &str) -> LinkKind {
    if let Some(rest) = link.strip_prefix("//") {
        if rest.contains(host) {
            LinkKind::ProtocolRelative
        } else {
            LinkKind::External
        }
    } else if link.starts_with('/') {
        LinkKind::RootRelative
    } else if link.contains(host) {
        LinkKind::SameDomain
    } else {
        LinkKind::External
    }
}

/// Extracts the lowercase host from a URL, if it has one
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses and validates the root URL of a crawl
///
/// The root must be an absolute `http` or `https` URL with a host.
pub fn parse_root_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{input}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
