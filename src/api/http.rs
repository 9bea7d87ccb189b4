use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::RequestBuilder;
use std::time::Duration;
use url::Url;

use crate::models::config::HttpSettings;
use crate::utils::errors::InstallerError;

/// Shared HTTP client plus the header set each kind of request needs. Built
/// once per run and handed to every API client.
#[derive(Debug, Clone)]
pub struct HttpContext {
    client: reqwest::Client,
    accept_language: HeaderValue,
    cookie: Option<HeaderValue>,
}

impl HttpContext {
    pub fn new(settings: &HttpSettings) -> Result<Self, InstallerError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|e| InstallerError::InvalidConfig(format!("user agent: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let accept_language = HeaderValue::from_str(&settings.accept_language)
            .map_err(|e| InstallerError::InvalidConfig(format!("accept language: {e}")))?;
        let cookie = settings
            .cf_bm_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| HeaderValue::from_str(&format!("__cf_bm={token}")))
            .transpose()
            .map_err(|e| InstallerError::InvalidConfig(format!("cookie: {e}")))?;

        Ok(Self {
            client,
            accept_language,
            cookie,
        })
    }

    pub fn get_json(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .header(header::ACCEPT, "application/json")
    }

    /// Browser-like request used for search engine pages.
    pub fn get_html(&self, url: Url) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .header(header::ACCEPT_LANGUAGE, self.accept_language.clone())
            .header("Set-GPC", "1");

        match &self.cookie {
            Some(cookie) => request.header(header::COOKIE, cookie.clone()),
            None => request,
        }
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.client.get(url)
    }
}

/// Appends path segments to `base`, percent-encoding each one.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, InstallerError> {
    let mut url = Url::parse(base).map_err(|e| InstallerError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| InstallerError::InvalidUrl(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
