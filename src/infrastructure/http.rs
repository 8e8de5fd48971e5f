use crate::domain::config::HarnessSettings;
use crate::domain::ports::{ConfigEndpoint, ConfigLookup, EndpointResponse};
use crate::error::{FetchFailure, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as StdError;

pub const PUBLISHABLE_KEY_HEADER: &str = "X-Publishable-Key";
pub const BUSINESS_ID_PARAM: &str = "businessId";

/// Config-lookup endpoint reached over HTTP.
pub struct HttpConfigEndpoint {
    client: Client,
    url: String,
}

impl HttpConfigEndpoint {
    pub fn new(settings: &HarnessSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.http_timeout).build()?;
        Ok(Self {
            client,
            url: settings.config_endpoint.clone(),
        })
    }
}

#[async_trait]
impl ConfigEndpoint for HttpConfigEndpoint {
    async fn fetch(&self, lookup: &ConfigLookup) -> std::result::Result<EndpointResponse, FetchFailure> {
        let response = self
            .client
            .get(&self.url)
            .query(&[(BUSINESS_ID_PARAM, lookup.business_id.as_str())])
            .header(PUBLISHABLE_KEY_HEADER, &lookup.publishable_key)
            .bearer_auth(&lookup.sdk_token)
            .send()
            .await
            .map_err(|e| FetchFailure(error_chain(&e)))?;

        let status = response.status().as_u16();
        // The body is informational; an unreadable one still counts as a response.
        let body = response.json::<Value>().await.ok();
        tracing::debug!(status, url = %self.url, "config lookup answered");

        Ok(EndpointResponse { status, body })
    }
}

/// Joins an error and its sources, so substring checks see the root cause.
fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
