use crate::domain::errors::FetchError;
use crate::domain::ports::LogstashApi;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// reqwest-backed client for the Logstash monitoring API
pub struct HttpLogstashClient {
    client: Client,
}

impl HttpLogstashClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: HttpClientFactory::create_client(timeout)?,
        })
    }

    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        debug!("HttpLogstashClient: GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LogstashApi for HttpLogstashClient {
    async fn ping(&self, url: &Url) -> Result<(), FetchError> {
        self.get(url).await.map(|_| ())
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

fn transport_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
