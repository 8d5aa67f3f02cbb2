use crate::domain::errors::FetchError;
use crate::domain::ports::LogstashApi;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Default)]
struct MockState {
    documents: HashMap<String, Value>,
    failures: HashMap<String, FetchError>,
    requests: Vec<String>,
}

/// In-memory Logstash API keyed by request path.
///
/// `ping` succeeds unless a failure is registered for the path. `fetch_json`
/// returns the registered document, or a 404 status error.
#[derive(Clone, Default)]
pub struct MockLogstashApi {
    state: Arc<Mutex<MockState>>,
}

impl MockLogstashApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_json(&self, path: &str, doc: Value) {
        if let Ok(mut state) = self.state.lock() {
            state.documents.insert(path.to_string(), doc);
        }
    }

    pub fn fail_path(&self, path: &str, error: FetchError) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(path.to_string(), error);
        }
    }

    /// Paths requested so far, in order
    pub fn requested_paths(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    fn record(&self, url: &Url) -> Result<Option<Value>, FetchError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let path = url.path().to_string();
        state.requests.push(path.clone());

        if let Some(err) = state.failures.get(&path) {
            return Err(err.clone());
        }
        Ok(state.documents.get(&path).cloned())
    }
}

#[async_trait]
impl LogstashApi for MockLogstashApi {
    async fn ping(&self, url: &Url) -> Result<(), FetchError> {
        self.record(url).map(|_| ())
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        self.record(url)?.ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
