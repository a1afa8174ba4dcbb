use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::pagination::{next_link, Paging};
use crate::auth::Token;
use crate::error::{CommitLensError, Result};

pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: Token,
    paging: Paging,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorDto {
    message: String,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .user_agent("CommitLens/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(|e| CommitLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| CommitLensError::Config(format!("Invalid GitHub API URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
            paging: Paging::default(),
        })
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.token.as_str())
    }

    /// Append percent-encoded path segments to the API base URL.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CommitLensError::Config(format!("Invalid GitHub API URL: {}", self.api_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a single JSON object.
    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        debug!("GET {url}");
        let response = self.auth_request(self.client.get(url)).send().await?;
        let response = check_status(response, resource).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a JSON array, reading as many pages as the configured paging allows.
    pub(super) async fn get_list<T: DeserializeOwned>(
        &self,
        mut url: Url,
        resource: &str,
    ) -> Result<Vec<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &self.paging.per_page().to_string());

        let max_pages = self.paging.max_pages();
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            debug!("GET {url}");
            let response = self.auth_request(self.client.get(url)).send().await?;
            let response = check_status(response, resource).await?;
            let next = next_link(response.headers());

            let body = response.text().await?;
            let batch: Vec<T> = serde_json::from_str(&body)?;
            let fetched_count = batch.len();
            items.extend(batch);

            info!(
                "Page {page}: fetched {fetched_count} {resource} (total: {})",
                items.len()
            );

            match next {
                Some(next_url) if page < max_pages => {
                    url = next_url;
                    page += 1;
                }
                Some(_) => {
                    info!("Stopping at page limit of {max_pages} for {resource}");
                    break;
                }
                None => break,
            }
        }

        Ok(items)
    }
}

/// Map a non-success response onto the error taxonomy.
async fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GitHubErrorDto>(&body)
        .map(|dto| dto.message)
        .unwrap_or(body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CommitLensError::Auth(format!("{status} while fetching {resource}: {message}"))
        }
        StatusCode::NOT_FOUND => CommitLensError::NotFound(resource.to_string()),
        _ => CommitLensError::Api { status, message },
    })
}
