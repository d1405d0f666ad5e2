//! Listing extraction from source page HTML
//!
//! A source page is a chunk of HTML containing repeated listing items. Which
//! element marks one item is configured per deployment (`listing-selector`);
//! within an item this module pulls out the text, the first link, an author
//! if one is marked up, and a publication timestamp from a `<time>` tag.

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use url::Url;

/// One listing item as extracted from a page, before it is tied to a source
#[derive(Debug, Clone)]
pub struct ExtractedListing {
    pub text: String,
    pub permalink: Option<String>,
    pub author: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Extracts all listing items matching `listing_selector` from `html`
///
/// Relative permalinks are resolved against `page_url`. Items the selector
/// does not match are simply absent; an invalid selector yields no items
/// (selectors are validated when the fetcher is constructed).
pub fn extract_listings(html: &str, page_url: &Url, listing_selector: &str) -> Vec<ExtractedListing> {
    let document = Html::parse_document(html);

    let Ok(item_selector) = Selector::parse(listing_selector) else {
        return Vec::new();
    };

    document
        .select(&item_selector)
        .map(|item| ExtractedListing {
            text: item.text().collect::<Vec<_>>().join(" "),
            permalink: extract_permalink(&item, page_url),
            author: extract_author(&item),
            posted_at: extract_posted_at(&item),
        })
        .collect()
}

/// First link inside the item, resolved to an absolute URL
fn extract_permalink(item: &scraper::ElementRef<'_>, page_url: &Url) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;

    item.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .next()
}

fn extract_author(item: &scraper::ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse(".author").ok()?;

    item.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Publication time from `<time datetime="...">`, RFC 3339
fn extract_posted_at(item: &scraper::ElementRef<'_>) -> Option<DateTime<Utc>> {
    let selector = Selector::parse("time[datetime]").ok()?;

    item.select(&selector)
        .filter_map(|el| el.value().attr("datetime"))
        .filter_map(|raw| raw.parse::<DateTime<Utc>>().ok())
        .next()
}

/// Resolves a link href to an absolute URL, skipping non-HTTP schemes
fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = page_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    Some(resolved.to_string())
}
