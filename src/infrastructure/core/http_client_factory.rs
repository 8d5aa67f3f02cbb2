use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates an HTTP client for the monitoring API.
    ///
    /// `timeout` bounds each whole request. No retry layer: a failed request
    /// is reported once and the next poll tries again.
    pub fn create_client(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("logstash-check/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}
