use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::{debug, warn};

use super::{LogoSource, TreeListing};
use crate::config::RemoteConfig;
use crate::errors::{AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// tvlogos repository on GitHub: trees API for the listing, raw host for bytes
pub struct GithubTreeSource {
    client: Client,
    tree_url: String,
    raw_base_url: String,
    token: Option<String>,
}

impl GithubTreeSource {
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        if config.token.is_some() {
            debug!("GitHub token configured, using authenticated requests");
        }

        Ok(Self {
            client,
            tree_url: config.tree_url.clone(),
            raw_base_url: config.raw_base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// `log_url` is the credential-masked form used in errors and logs
    async fn get(&self, url: &str, log_url: &str) -> SourceResult<Response> {
        let response = self
            .request(url)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(log_url, e))?;

        check_status(log_url, response.status())?;
        Ok(response)
    }
}

/// Map a non-success status onto [`SourceError`], warning on rate limits
fn check_status(log_url: &str, status: StatusCode) -> SourceResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let error = SourceError::from_status(log_url, status.as_u16());
    if error.is_rate_limited() {
        warn!(url = %log_url, status = status.as_u16(), "GitHub rate limit hit");
    }
    Err(error)
}

#[async_trait]
impl LogoSource for GithubTreeSource {
    fn label(&self) -> &str {
        "github:tvlogos"
    }

    async fn fetch_tree(&self) -> SourceResult<TreeListing> {
        let log_url = UrlUtils::obfuscate_credentials(&self.tree_url);
        debug!("Fetching tree listing from {}", log_url);
        let response = self.get(&self.tree_url, &log_url).await?;

        let listing: TreeListing = response
            .json()
            .await
            .map_err(|e| SourceError::from_reqwest(&log_url, e))?;

        if listing.truncated {
            warn!(
                "Tree listing was truncated by GitHub ({} nodes returned)",
                listing.tree.len()
            );
        }

        debug!("Tree listing returned {} nodes", listing.tree.len());
        Ok(listing)
    }

    async fn fetch_raw(&self, path: &str) -> SourceResult<Bytes> {
        let url = UrlUtils::raw_content_url(&self.raw_base_url, path);
        let log_url = UrlUtils::obfuscate_credentials(&url);
        debug!("Downloading raw content from {}", log_url);

        let response = self.get(&url, &log_url).await?;
        response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(&log_url, e))
    }
}
