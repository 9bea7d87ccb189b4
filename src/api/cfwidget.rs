use tracing::debug;

use crate::api::http::{endpoint, HttpContext};
use crate::models::project::Author;

/// Looks up authors and their projects on the CFWidget directory. CurseForge
/// offers no name-to-id lookup, so an author's project list is the most
/// reliable way to find an id without scraping.
#[derive(Debug, Clone)]
pub struct CfWidgetClient {
    http: HttpContext,
    base_url: String,
}

impl CfWidgetClient {
    pub fn new(http: HttpContext, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    /// `None` covers every way the lookup can fail: transport errors, error
    /// statuses and bodies that are not an author.
    pub async fn fetch_author(&self, name: &str) -> Option<Author> {
        let url = match endpoint(&self.base_url, &["author", "search", name]) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot build author URL for {}: {}", name, e);
                return None;
            }
        };

        let response = match self.http.get_json(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Author request for {} failed: {}", name, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Author request for {} returned {}", name, response.status());
            return None;
        }

        match response.json::<Author>().await {
            Ok(author) => Some(author),
            Err(e) => {
                debug!("Unparsable author response for {}: {}", name, e);
                None
            }
        }
    }
}
