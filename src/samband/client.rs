use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::debug;

use super::relation::{HierarchyDocument, SambandSummary};

const API_PREFIX: &str = "api/plugins/praksis-nhn-nautobot/samband";
const UI_PREFIX: &str = "/plugins/praksis-nhn-nautobot/samband";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid API URL {url}")]
    InvalidUrl { url: String },

    #[error("API token contains characters not allowed in a header")]
    InvalidToken,

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP error! Status: {}", status.as_u16())]
    Status { status: StatusCode, url: String },

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct HierarchyClient {
    http: Client,
    base_url: String,
}

impl HierarchyClient {
    pub fn new(options: ClientOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = options.token.as_deref().filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|_| FetchError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        // The blocking client applies a 30 second timeout unless told otherwise.
        let http = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            http,
            base_url: options.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_hierarchy(
        &self,
        samband_id: &str,
        depth: u32,
    ) -> Result<HierarchyDocument, FetchError> {
        let url = hierarchy_url(&self.base_url, samband_id, depth)?;
        debug!(%url, "fetching samband hierarchy");
        self.get_json(url)
    }

    pub fn fetch_summary(&self, samband_id: &str) -> Result<SambandSummary, FetchError> {
        let url = summary_url(&self.base_url, samband_id)?;
        debug!(%url, "fetching samband summary");
        self.get_json(url)
    }

    fn get_json<T>(&self, url: reqwest::Url) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.json::<T>().map_err(FetchError::Decode)
    }
}

fn api_base(base_url: &str) -> Result<reqwest::Url, FetchError> {
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    reqwest::Url::parse(&normalized).map_err(|_| FetchError::InvalidUrl {
        url: base_url.to_owned(),
    })
}

pub fn hierarchy_url(
    base_url: &str,
    samband_id: &str,
    depth: u32,
) -> Result<reqwest::Url, FetchError> {
    let mut url = api_base(base_url)?
        .join(&format!("{API_PREFIX}/{samband_id}/hierarchy/"))
        .map_err(|_| FetchError::InvalidUrl {
            url: base_url.to_owned(),
        })?;
    url.query_pairs_mut()
        .append_pair("depth", &depth.to_string());
    Ok(url)
}

pub fn summary_url(base_url: &str, samband_id: &str) -> Result<reqwest::Url, FetchError> {
    api_base(base_url)?
        .join(&format!("{API_PREFIX}/{samband_id}/"))
        .map_err(|_| FetchError::InvalidUrl {
            url: base_url.to_owned(),
        })
}

pub fn graph_page_path(samband_id: &str) -> String {
    format!("{UI_PREFIX}/{samband_id}/graph/")
}
