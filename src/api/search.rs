//! Search engine fallback for project ids.
//!
//! CurseForge project pages show `Project ID <n>` in their sidebar and search
//! engines tend to quote it in result snippets, so a site-restricted query for
//! the slug usually surfaces the id when every API route has failed.

use tracing::debug;
use url::Url;

use crate::api::http::HttpContext;
use crate::html::{AttrFilter, Document, DocumentParser};
use crate::models::mod_ref::url_slug;
use crate::utils::errors::InstallerError;

/// Result entries inspected per query.
pub const MAX_SEARCHABLE_RESULTS: usize = 6;

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpContext,
    base_url: String,
    site: String,
}

impl SearchClient {
    pub fn new(http: HttpContext, base_url: &str, site: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            site: site.to_string(),
        }
    }

    /// `<term> Project ID files site:<site>`
    pub fn search_url(&self, term: &str) -> Result<Url, InstallerError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| InstallerError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut()
            .append_pair("q", &format!("{} Project ID files site:{}", term, self.site));
        Ok(url)
    }

    /// Fetches the result page for `term`. Anything but a 200 is `None`.
    pub async fn fetch_results(&self, term: &str) -> Option<String> {
        let url = self.search_url(term).ok()?;
        let response = match self.http.get_html(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Search request for {} failed: {}", term, e);
                return None;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            debug!("Search request for {} returned {}", term, response.status());
            return None;
        }
        response.text().await.ok()
    }

    /// Searches for `term` and scrapes the id of the result whose URL slug is
    /// `slug`.
    pub async fn scrape(&self, term: &str, slug: &str, parser: &dyn DocumentParser) -> Option<u32> {
        let html = self.fetch_results(term).await?;
        scrape_project_id(&parser.parse_document(&html), slug)
    }
}

/// Scans the first [`MAX_SEARCHABLE_RESULTS`] results for one whose displayed
/// URL has `slug` as its slug and whose snippet contains `ID <digits>`.
pub fn scrape_project_id(document: &Document, slug: &str) -> Option<u32> {
    let container = document.find(
        "div",
        &[AttrFilter::exact("id", "links"), AttrFilter::exact("class", "results")],
    );
    let Some(container) = container else {
        debug!("Search returned no results container");
        return None;
    };

    let results = document.find_all_within(
        container,
        "div",
        &[AttrFilter::starts_with("class", "result results_links")],
    );

    results
        .into_iter()
        .take(MAX_SEARCHABLE_RESULTS)
        .find_map(|result| {
            let url_anchor =
                document.find_within(result, "a", &[AttrFilter::exact("class", "result__url")])?;
            let displayed_url = document.text(url_anchor);
            if url_slug(displayed_url.trim()) != slug {
                return None;
            }

            let snippet = document.find_within(
                result,
                "a",
                &[AttrFilter::exact("class", "result__snippet")],
            )?;
            id_after_token(&document.text(snippet))
        })
}

/// Reads the first run of digits after the first `ID` in `text`.
///
/// `"Project ID 123456 files"` gives `123456`; `"IDentify"` gives `None`.
pub fn id_after_token(text: &str) -> Option<u32> {
    let start = text.find("ID")? + 2;
    let digits: String = text[start..]
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
