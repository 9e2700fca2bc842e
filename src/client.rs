use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client as ReqwestClient, Url};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::errors::{MyAnimeError, Result};
use crate::filter::filter_episode_links;
use crate::reconcile::ListingSource;

pub struct MyAnimeClient {
    base_url: Url,
    episode_pattern: Regex,
    user_agent: String,
    client: ReqwestClient,
}

impl MyAnimeClient {
    /// creates a client for one tag listing.
    ///
    /// the base url is normalized to end with `/` so listing pages can be appended to it.
    pub fn new(base_url: &str, episode_pattern: Regex, user_agent: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|_| MyAnimeError::BaseUrl {
            url: base_url.to_string(),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(MyAnimeError::BaseUrl {
                url: base_url.to_string(),
            });
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = ReqwestClient::builder()
            .build()
            .map_err(MyAnimeError::BuildClient)?;

        info!(base = %base, "initialized myanime client");

        Ok(Self {
            base_url: base,
            episode_pattern,
            user_agent: user_agent.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// address of a listing page; page 1 is the base url itself.
    pub fn listing_page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.to_string()
        } else {
            format!("{}page/{page}/", self.base_url)
        }
    }

    fn headers(&self, referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        if let Ok(v) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, v);
        }

        if let Ok(v) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, v);
        }

        headers
    }

    async fn ensure_success(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read error body>".to_string());

        Err(MyAnimeError::HttpStatus {
            context: context.to_string(),
            status,
            body,
        })
    }

    async fn get_text(&self, url: &str, context: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .headers(self.headers(self.base_url.as_str()))
            .send()
            .await
            .map_err(|source| MyAnimeError::Request {
                context: format!("getting {context}"),
                source,
            })?;

        let resp = Self::ensure_success(resp, context).await?;

        resp.text()
            .await
            .map_err(|source| MyAnimeError::ResponseBody {
                context: format!("reading {context} body"),
                source,
            })
    }

    /// collects the episode page links found on one listing page, newest first.
    ///
    /// an empty result means the listing has no more episodes.
    pub async fn fetch_listing_page(&self, page: u32) -> Result<Vec<String>> {
        let url = self.listing_page_url(page);
        let text = self.get_text(&url, &format!("listing page {page}")).await?;
        let links = extract_listing_links(&text, &self.episode_pattern);

        debug!(page, url = %url, found = links.len(), "fetched listing page");
        Ok(links)
    }

    /// returns the raw html of an episode page.
    pub async fn fetch_episode_page(&self, episode_url: &str) -> Result<String> {
        let text = self
            .get_text(episode_url, &format!("episode page {episode_url}"))
            .await?;
        debug!(url = episode_url, bytes = text.len(), "fetched episode page");
        Ok(text)
    }
}

impl ListingSource for MyAnimeClient {
    async fn fetch_listing_page(&self, page: u32) -> Result<Vec<String>> {
        MyAnimeClient::fetch_listing_page(self, page).await
    }

    fn describe_page(&self, page: u32) -> String {
        self.listing_page_url(page)
    }
}

/// anchors inside the main content blocks of a listing page that point at episode pages.
pub fn extract_listing_links(html: &str, episode_pattern: &Regex) -> Vec<String> {
    let doc = Html::parse_document(html);
    let content_sel = Selector::parse("div.entry-main-content").expect("invalid selector");
    let anchor_sel = Selector::parse("a[href]").expect("invalid selector");

    let hrefs = doc
        .select(&content_sel)
        .flat_map(|content| content.select(&anchor_sel))
        .filter_map(|a| a.value().attr("href"));

    filter_episode_links(episode_pattern, hrefs)
}
