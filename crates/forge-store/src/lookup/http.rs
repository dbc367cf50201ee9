use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{LookupError, LookupSource, check_segment};

const USER_AGENT_VALUE: &str = concat!("forge/", env!("CARGO_PKG_VERSION"));

/// Blocking JSON client for a `{base}/{resource}/{index}` REST API.
#[derive(Debug, Clone)]
pub struct HttpLookupSource {
    client: Client,
    base_url: String,
}

impl HttpLookupSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Request {
                url: base_url.clone(),
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource_type: &str, index: &str) -> Result<String, LookupError> {
        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            check_segment(resource_type)?,
            check_segment(index)?
        ))
    }
}

impl LookupSource for HttpLookupSource {
    fn fetch(&self, resource_type: &str, index: &str) -> Result<Value, LookupError> {
        let url = self.url(resource_type, index)?;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LookupError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response.json::<Value>().map_err(|e| LookupError::Decode {
            url,
            message: e.to_string(),
        })
    }
}
