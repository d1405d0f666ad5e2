//! HTTP listing fetcher
//!
//! Production implementation of [`SourceFetcher`]: source pages live at
//! `<base-url>/<source>?<page-param>=N`, and each page is fetched with a GET
//! and scanned for listing items.

use crate::config::SourceId;
use crate::fetch::parse::extract_listings;
use crate::fetch::{FetchError, FetcherOptions, RawListing, SourceFetcher};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client from the configured fetcher options
pub fn build_http_client(options: &FetcherOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(Duration::from_secs(options.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages over HTTP and extracts raw listings from them
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    options: FetcherOptions,
}

impl HttpFetcher {
    /// Creates a fetcher from an options bag
    ///
    /// Fails if the base URL or listing selector cannot be parsed, or if the
    /// HTTP client cannot be built.
    pub fn new(options: FetcherOptions) -> Result<Self, FetchError> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| FetchError::Options(format!("base-url: {}", e)))?;

        Selector::parse(&options.listing_selector)
            .map_err(|e| FetchError::Options(format!("listing-selector: {}", e)))?;

        let client = build_http_client(&options)?;

        Ok(Self {
            client,
            base_url,
            options,
        })
    }

    /// URL of one listing page for a source
    fn page_url(&self, source: &SourceId, page: u32) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                group: source.to_string(),
                message: "base-url cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(source.as_str());

        url.query_pairs_mut()
            .append_pair(&self.options.page_param, &page.to_string());

        Ok(url)
    }

    /// Fetches one page and extracts its listings
    async fn fetch_page(&self, source: &SourceId, page: u32) -> Result<Vec<RawListing>, FetchError> {
        let url = self.page_url(source, page)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(e, &url))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            source: e,
        })?;

        let listings = extract_listings(&body, &url, &self.options.listing_selector)
            .into_iter()
            .map(|item| RawListing {
                source: source.clone(),
                text: item.text,
                permalink: item.permalink,
                author: item.author,
                posted_at: item.posted_at,
            })
            .collect();

        Ok(listings)
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceId, pages: u32) -> Result<Vec<RawListing>, FetchError> {
        let mut listings = Vec::new();

        for page in 1..=pages {
            let mut page_listings = self.fetch_page(source, page).await?;
            tracing::debug!(
                source = %source,
                page,
                found = page_listings.len(),
                "fetched listing page"
            );
            listings.append(&mut page_listings);
        }

        Ok(listings)
    }
}

fn classify_request_error(error: reqwest::Error, url: &Url) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
