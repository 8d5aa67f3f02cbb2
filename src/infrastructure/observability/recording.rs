use crate::domain::ports::{GaugeSink, ServiceCheckSink};
use crate::domain::service_check::ServiceCheckStatus;
use std::sync::Mutex;

/// In-memory sink keeping every sample in arrival order
#[derive(Default)]
pub struct RecordingSink {
    gauges: Mutex<Vec<(String, f64)>>,
    service_checks: Mutex<Vec<(String, ServiceCheckStatus, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gauges(&self) -> Vec<(String, f64)> {
        self.gauges.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Last value recorded under `name`
    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        self.gauges
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn service_checks(&self) -> Vec<(String, ServiceCheckStatus, String)> {
        self.service_checks
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut g) = self.gauges.lock() {
            g.clear();
        }
        if let Ok(mut c) = self.service_checks.lock() {
            c.clear();
        }
    }
}

impl GaugeSink for RecordingSink {
    fn gauge(&self, name: &str, value: f64) {
        if let Ok(mut g) = self.gauges.lock() {
            g.push((name.to_string(), value));
        }
    }
}

impl ServiceCheckSink for RecordingSink {
    fn service_check(&self, name: &str, status: ServiceCheckStatus, message: &str) {
        if let Ok(mut c) = self.service_checks.lock() {
            c.push((name.to_string(), status, message.to_string()));
        }
    }
}
