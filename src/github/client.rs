use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use super::error::ApiError;
use super::pagination::{PageRequest, parse_next_link};

/// Public GitHub REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Per-request timeout applied when the caller does not pick one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Thin REST client shared by the wrapper, the tools and the loaders.
///
/// Every request carries the bearer token (when configured), the GitHub media
/// type and a fixed timeout. Failures are surfaced as [`ApiError`] and never
/// retried.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `token` - Optional bearer token sent with every request
    /// * `api_base_url` - API root, defaults to [`DEFAULT_API_BASE_URL`]
    /// * `timeout` - Per-request timeout, defaults to [`DEFAULT_TIMEOUT`]
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(
        token: Option<String>,
        api_base_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_base_url = api_base_url
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Url::parse(&api_base_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", api_base_url))?;

        let http = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base_url,
            token,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// True when `url` shares scheme, host and port with the API base, so the
    /// token may be sent to it
    fn is_api_origin(&self, url: &Url) -> bool {
        Url::parse(&self.api_base_url).is_ok_and(|base| base.origin() == url.origin())
    }

    /// Resolve an API path such as `repos/owner/name/issues` against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.api_base_url, path.trim_start_matches('/'));
        Url::parse(&raw).with_context(|| format!("Invalid API endpoint: {}", raw))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.execute(self.request(Method::GET, url)).await?;
        Self::decode(response).await
    }

    /// Fetch a JSON array listing, following `Link: rel="next"` headers.
    ///
    /// When `pages` carries an explicit page or page size, exactly one page is
    /// fetched. A failure on any page aborts the walk and returns that error.
    /// Next links pointing outside the API origin end the walk.
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        mut url: Url,
        pages: PageRequest,
    ) -> Result<Vec<T>, ApiError> {
        pages.apply(&mut url);

        let mut items = Vec::new();
        let mut next = Some(url);
        while let Some(current) = next.take() {
            debug!("GET {} (paginated)", current);
            let response = self.execute(self.request(Method::GET, current)).await?;
            let link = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            let page: Vec<T> = Self::decode(response).await?;
            items.extend(page);

            if pages.is_bounded() {
                break;
            }

            next = link
                .as_deref()
                .and_then(parse_next_link)
                .and_then(|raw| match Url::parse(&raw) {
                    Ok(next_url) => Some(next_url),
                    Err(e) => {
                        warn!("Ignoring unparseable next page URL {}: {}", raw, e);
                        None
                    }
                })
                .filter(|next_url| {
                    let trusted = self.is_api_origin(next_url);
                    if !trusted {
                        warn!(
                            "Not following next page URL outside {}: {}",
                            self.api_base_url, next_url
                        );
                    }
                    trusted
                });
        }

        Ok(items)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", url);
        let response = self
            .execute(self.request(Method::POST, url).json(body))
            .await?;
        Self::decode(response).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("PUT {}", url);
        let response = self
            .execute(self.request(Method::PUT, url).json(body))
            .await?;
        Self::decode(response).await
    }

    /// DELETE with a JSON body, as the contents API requires
    pub async fn delete_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        debug!("DELETE {}", url);
        self.execute(self.request(Method::DELETE, url).json(body))
            .await?;
        Ok(())
    }
}

/// Percent-encode each segment of a repository path, keeping the separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
