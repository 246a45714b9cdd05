/// External feed clients module
use crate::config::HttpSettings;
use crate::domain::{FeedCollection, TimeRange};
use crate::errors::{FeedError, FeedResult};
use reqwest::Client;
use std::future::Future;
use tracing::debug;

/// Remote GeoJSON endpoints, one per time range
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEndpoints {
    pub day: String,
    pub week: String,
    pub month: String,
}

impl FeedEndpoints {
    pub fn url_for(&self, range: TimeRange) -> &str {
        match range {
            TimeRange::Day => &self.day,
            TimeRange::Week => &self.week,
            TimeRange::Month => &self.month,
        }
    }
}

/// Anything that can hand back a decoded feed document for a URL
pub trait FeedSource {
    fn fetch_feed(&self, url: &str) -> impl Future<Output = FeedResult<FeedCollection>> + Send;
}

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> FeedResult<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FeedError::Client)?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// USGS summary feed client
pub struct UsgsClient {
    http_client: HttpClient,
}

impl UsgsClient {
    pub fn new(settings: &HttpSettings) -> FeedResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(settings)?,
        })
    }
}

impl FeedSource for UsgsClient {
    async fn fetch_feed(&self, url: &str) -> FeedResult<FeedCollection> {
        debug!("Requesting feed {}", url);
        let resp = self.http_client.get_client().get(url).send().await?;

        if !resp.status().is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.bytes().await?;
        decode_feed(&body)
    }
}

/// Decode a feed body, keeping parse failures apart from transport ones
pub fn decode_feed(body: &[u8]) -> FeedResult<FeedCollection> {
    Ok(serde_json::from_slice(body)?)
}
