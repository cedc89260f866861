//! Favicon discovery.
//!
//! Fetches a page, finds the first `<link>` whose `rel` has `icon` as a word,
//! resolves its `href` against the page URL and decodes whatever comes back.
//! Discovery never fails outward: every problem is a [`DiscoveryMiss`],
//! logged at debug level and reported to the caller as `None`.

use crate::fetch::Fetcher;
use image::DynamicImage;
use regex::Regex;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

static ICON_REL: OnceLock<Regex> = OnceLock::new();

fn icon_rel() -> &'static Regex {
    ICON_REL.get_or_init(|| Regex::new(r"\bicon\b").expect("icon rel pattern is valid"))
}

/// Why a discovery attempt came back empty
#[derive(Debug)]
pub enum DiscoveryMiss {
    /// The page URL could not be parsed
    InvalidPageUrl(String),
    /// The page or the icon could not be fetched
    Fetch(String),
    /// No `<link>` with an icon `rel` in the page
    NoIconLink,
    /// The first icon link has no `href`
    MissingHref,
    /// The `href` could not be joined onto the page URL
    BadReference(String),
    /// The icon bytes are not a supported raster image
    Decode(String),
}

impl fmt::Display for DiscoveryMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMiss::InvalidPageUrl(e) => write!(f, "invalid page URL: {}", e),
            DiscoveryMiss::Fetch(e) => write!(f, "fetch failed: {}", e),
            DiscoveryMiss::NoIconLink => write!(f, "no <link rel=\"icon\"> element"),
            DiscoveryMiss::MissingHref => write!(f, "icon link has no href"),
            DiscoveryMiss::BadReference(e) => write!(f, "cannot resolve icon href: {}", e),
            DiscoveryMiss::Decode(e) => write!(f, "icon is not a decodable image: {}", e),
        }
    }
}

/// Whether a `rel` attribute value names an icon.
///
/// `icon` must appear as a whole word, so `shortcut icon` and
/// `apple-touch-icon` match while `iconic` does not. Case-sensitive.
pub fn is_icon_rel(rel: &str) -> bool {
    icon_rel().is_match(rel)
}

/// The `href` of the first icon `<link>` in document order.
///
/// Only the first matching link is considered; if it lacks an `href`,
/// later links are not consulted.
pub fn find_icon_href(html: &str) -> Result<String, DiscoveryMiss> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("link[rel]").expect("link selector is valid");

    let link = document
        .select(&link_sel)
        .find(|node| node.value().attr("rel").is_some_and(is_icon_rel))
        .ok_or(DiscoveryMiss::NoIconLink)?;

    link.value()
        .attr("href")
        .map(str::to_string)
        .ok_or(DiscoveryMiss::MissingHref)
}

/// Join an icon reference onto the page it was found on.
pub fn resolve_icon_url(page_url: &str, href: &str) -> Result<Url, DiscoveryMiss> {
    let base = Url::parse(page_url).map_err(|e| DiscoveryMiss::InvalidPageUrl(e.to_string()))?;
    base.join(href)
        .map_err(|e| DiscoveryMiss::BadReference(format!("{:?}: {}", href, e)))
}

/// The site root (scheme and authority) of `url`, e.g.
/// `https://example.com/a/b?q` -> `https://example.com/`.
///
/// Returns `None` for unparseable URLs and URLs without a host.
pub fn site_root(url: &str) -> Option<Url> {
    let mut root = Url::parse(url).ok()?;
    if root.cannot_be_a_base() || !root.has_host() {
        return None;
    }
    root.set_path("");
    root.set_query(None);
    root.set_fragment(None);
    Some(root)
}

fn fetch<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> Result<Vec<u8>, DiscoveryMiss> {
    fetcher.get(url).map_err(|e| DiscoveryMiss::Fetch(e.to_string()))
}

/// Run every discovery step, stopping at the first miss.
pub fn try_fetch_icon<F: Fetcher + ?Sized>(
    fetcher: &F,
    page_url: &str,
) -> Result<(DynamicImage, Url), DiscoveryMiss> {
    let page = fetch(fetcher, page_url)?;
    let html = String::from_utf8_lossy(&page);
    let href = find_icon_href(&html)?;
    let icon_url = resolve_icon_url(page_url, &href)?;
    log::debug!("Icon link on {} points to {}", page_url, icon_url);

    let bytes = fetch(fetcher, icon_url.as_str())?;
    let image = image::load_from_memory(&bytes).map_err(|e| DiscoveryMiss::Decode(e.to_string()))?;
    Ok((image, icon_url))
}

/// Look for a favicon on `page_url`. Never fails: any miss yields `None`.
pub fn fetch_icon<F: Fetcher + ?Sized>(fetcher: &F, page_url: &str) -> Option<(DynamicImage, Url)> {
    match try_fetch_icon(fetcher, page_url) {
        Ok(found) => Some(found),
        Err(miss) => {
            log::debug!("No favicon from {}: {}", page_url, miss);
            None
        }
    }
}
