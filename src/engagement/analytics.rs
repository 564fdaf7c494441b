use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Value,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(name: &str, properties: Value) -> Self {
        Self {
            name: name.to_string(),
            properties,
            timestamp: Utc::now(),
        }
    }
}

/// Fire-and-forget analytics transport. Implementations must not block and
/// must not retry.
pub trait AnalyticsSink {
    fn track(&self, event: AnalyticsEvent);
}

/// Posts each event to the backend analytics endpoint.
pub struct HttpAnalyticsSink {
    endpoint: String,
}

impl HttpAnalyticsSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl AnalyticsSink for HttpAnalyticsSink {
    fn track(&self, event: AnalyticsEvent) {
        let endpoint = self.endpoint.clone();
        spawn_local(async move {
            let request = match Request::post(&endpoint).json(&event) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to encode analytics event {}: {}", event.name, e);
                    return;
                }
            };
            match request.send().await {
                Ok(response) if !response.ok() => {
                    debug!("Analytics endpoint returned {} for {}", response.status(), event.name);
                }
                Ok(_) => {}
                Err(e) => debug!("Analytics event {} dropped: {}", event.name, e),
            }
        });
    }
}

/// Writes events to the console log only. Used in debug builds.
pub struct LogAnalyticsSink;

impl AnalyticsSink for LogAnalyticsSink {
    fn track(&self, event: AnalyticsEvent) {
        debug!("analytics: {} {}", event.name, event.properties);
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    pub struct RecordingSink {
        events: Rc<RefCell<Vec<AnalyticsEvent>>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<AnalyticsEvent> {
            self.events.borrow().clone()
        }

        pub fn named(&self, name: &str) -> Vec<AnalyticsEvent> {
            self.events
                .borrow()
                .iter()
                .filter(|e| e.name == name)
                .cloned()
                .collect()
        }
    }

    impl AnalyticsSink for RecordingSink {
        fn track(&self, event: AnalyticsEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}
