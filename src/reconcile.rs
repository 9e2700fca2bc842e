//! turns a newest-first, paginated listing into the exact episode range asked for.
//!
//! listing pages are not indexed by episode number, so the reconciler guesses how
//! many pages it can skip, walks forward until it has seen the first wanted episode,
//! then trims both ends of what it collected.

use std::future::Future;

use tracing::{debug, info};

use crate::config::{EpisodeRange, ShowConfig};
use crate::delay::Delay;
use crate::errors::{MyAnimeError, Result};
use crate::filter::episode_number;

/// how many episodes a listing page is assumed to hold when estimating skips.
pub const ASSUMED_EPISODES_PER_PAGE: i32 = 10;

/// anything that can hand out listing pages of episode urls, newest first.
pub trait ListingSource {
    /// episode urls on `page` (1-based). empty once the listing is exhausted.
    fn fetch_listing_page(&self, page: u32) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// human readable address of a page, used in errors and logs.
    fn describe_page(&self, page: u32) -> String {
        format!("listing page {page}")
    }
}

/// result of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// episode page urls, newest first.
    pub urls: Vec<String>,
    /// the listing ran out of pages before the first wanted episode was seen.
    pub exhausted: bool,
}

impl Reconciled {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// pages to skip past page 1, assuming [`ASSUMED_EPISODES_PER_PAGE`] episodes per page.
///
/// `None` means page 1 may already hold wanted episodes and must be kept.
/// `Some(n)` means page 1 is entirely newer than `last` and fetching should resume at
/// page `n + 2`. This is only a hint: the real page density is unknown, and the
/// reconciler corrects an overshoot by stepping back.
pub fn estimate_page_skip(latest_episode: i32, last: i32) -> Option<u32> {
    let episode_diff = latest_episode - last;
    if episode_diff > ASSUMED_EPISODES_PER_PAGE {
        Some((episode_diff / ASSUMED_EPISODES_PER_PAGE - 1) as u32)
    } else {
        None
    }
}

/// drops up to `extra` entries from the end. `extra <= 0` leaves the urls untouched.
pub fn trim_tail(urls: &mut Vec<String>, extra: i32) -> usize {
    if extra <= 0 {
        return 0;
    }
    let count = (extra as usize).min(urls.len());
    urls.truncate(urls.len() - count);
    count
}

/// drops up to `extra` entries from the front. `extra <= 0` leaves the urls untouched.
pub fn trim_head(urls: &mut Vec<String>, extra: i32) -> usize {
    if extra <= 0 {
        return 0;
    }
    let count = (extra as usize).min(urls.len());
    urls.drain(..count);
    count
}

pub struct RangeReconciler<'a, S> {
    source: &'a S,
    range: EpisodeRange,
    page_delay: Delay,
}

impl<'a, S: ListingSource> RangeReconciler<'a, S> {
    pub fn new(source: &'a S, config: &ShowConfig) -> Self {
        Self {
            source,
            range: config.range,
            page_delay: config.page_delay,
        }
    }

    pub fn with_range(source: &'a S, range: EpisodeRange, page_delay: Delay) -> Self {
        Self {
            source,
            range,
            page_delay,
        }
    }

    async fn fetch(&self, page: u32) -> Result<Vec<String>> {
        self.page_delay.wait().await;
        self.source.fetch_listing_page(page).await
    }

    pub async fn reconcile(&self) -> Result<Reconciled> {
        let first = self.range.first();
        let last = self.range.last();

        let first_page = self.source.fetch_listing_page(1).await?;
        let Some(newest) = first_page.first() else {
            return Err(MyAnimeError::NoEpisodesFound {
                url: self.source.describe_page(1),
            });
        };
        let latest_episode = episode_number(newest)?;
        info!(latest_episode, range = %self.range, "found latest episode");

        let (mut page, mut urls, mut next) = match estimate_page_skip(latest_episode, last) {
            Some(skip) => {
                debug!(skip, "skipping listing pages ahead of the range");
                self.seek(first_page, skip + 2).await?
            }
            None => (1, first_page, None),
        };

        let mut exhausted = false;
        let mut lowest = lowest_episode(&urls)?;
        while lowest.is_some_and(|episode| episode > first) {
            page += 1;
            let more = match next.take() {
                Some(more) => more,
                None => self.fetch(page).await?,
            };
            if more.is_empty() {
                debug!(page, "no more episodes found on listing page");
                exhausted = true;
                break;
            }
            urls.extend(more);
            lowest = lowest_episode(&urls)?;
            debug!(page, lowest = ?lowest, total = urls.len(), "extended episode list");
        }

        if let Some(lowest) = lowest {
            let dropped = trim_tail(&mut urls, first - lowest);
            debug!(dropped, "trimmed episodes older than the range");
        }

        if let Some(newest) = urls.first() {
            let newest = episode_number(newest)?;
            let dropped = trim_head(&mut urls, newest - last);
            debug!(dropped, "trimmed episodes newer than the range");
        }

        info!(count = urls.len(), exhausted, "reconciled episode range");
        Ok(Reconciled { urls, exhausted })
    }

    /// finds the first page at or after a skip that still starts at or above `last`.
    ///
    /// an empty page or one that starts below `last` means the skip overshot, so the
    /// search steps back a page at a time. stepping back to page 1 reuses `first_page`.
    ///
    /// the page stepped back from is returned too, so it is not fetched a second time.
    async fn seek(
        &self,
        first_page: Vec<String>,
        start: u32,
    ) -> Result<(u32, Vec<String>, Option<Vec<String>>)> {
        let last = self.range.last();
        let mut page = start;
        let mut following = None;

        while page > 1 {
            let urls = self.fetch(page).await?;
            let newest = urls.first().map(|url| episode_number(url)).transpose()?;
            match newest {
                Some(newest) if newest >= last => return Ok((page, urls, following)),
                Some(newest) => {
                    debug!(page, newest, "page skip overshot the range, stepping back");
                }
                None => debug!(page, "page skip went past the listing, stepping back"),
            }
            following = Some(urls);
            page -= 1;
        }

        Ok((1, first_page, following))
    }
}

fn lowest_episode(urls: &[String]) -> Result<Option<i32>> {
    urls.last().map(|url| episode_number(url)).transpose()
}
