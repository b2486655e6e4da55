use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{ClientError, Event, EventBus, EventType, Transport, api_url};

/// The translated strings of the active locale.
pub struct StringsState {
    transport: Arc<dyn Transport>,
    bus: Arc<EventBus>,
    base_url: String,
    current: RwLock<Option<(String, Value)>>,
}

impl StringsState {
    pub fn new(transport: Arc<dyn Transport>, bus: Arc<EventBus>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            bus,
            base_url: base_url.into(),
            current: RwLock::new(None),
        }
    }

    pub fn locale(&self) -> Option<String> {
        self.current.read().as_ref().map(|(locale, _)| locale.clone())
    }

    pub fn strings(&self) -> Value {
        self.current
            .read()
            .as_ref()
            .map(|(_, strings)| strings.clone())
            .unwrap_or(Value::Null)
    }

    /// Look up a dotted path like `mxxn.app.title`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let current = self.current.read();
        let (_, strings) = current.as_ref()?;

        path.split('.')
            .try_fold(strings, |node, key| node.get(key))
            .cloned()
    }

    /// Fetch the strings of a locale and make them the active ones.
    pub async fn load(&self, locale: &str) -> Result<(), ClientError> {
        let url = api_url(&self.base_url, &["mxxn", "strings", locale])?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(ClientError::Request {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let strings: Value = if response.body.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&response.body).map_err(|e| ClientError::Decode(e.to_string()))?
        };

        *self.current.write() = Some((locale.to_string(), strings.clone()));
        debug!("Strings of locale {} loaded", locale);

        self.bus
            .publish(Event::new(EventType::StringsChanged, strings))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;

    const URL: &str = "http://localhost:8000/app/mxxn/strings/";

    #[tokio::test]
    async fn test_load_and_get() {
        let transport = MockTransport::default().with(
            &format!("{}de", URL),
            200,
            r#"{"mxxn":{"app":{"title":"Titel"}},"mxns":{},"mxnapp":{}}"#,
        );
        let bus = Arc::new(EventBus::default());
        let state = StringsState::new(transport.shared(), bus.clone(), "http://localhost:8000");
        let mut receiver = bus.subscribe();

        state.load("de").await.unwrap();

        assert_eq!(state.locale().as_deref(), Some("de"));
        assert_eq!(state.get("mxxn.app.title"), Some(Value::from("Titel")));
        assert_eq!(state.get("mxxn.app.missing"), None);
        assert_eq!(
            receiver.recv().await.unwrap().event_type,
            EventType::StringsChanged
        );
    }

    #[tokio::test]
    async fn test_request_error_keeps_state() {
        let transport = MockTransport::default()
            .with(&format!("{}en", URL), 200, r#"{"mxxn":{"a":"b"}}"#)
            .with(&format!("{}fr", URL), 400, "");
        let state = StringsState::new(
            transport.shared(),
            Arc::new(EventBus::default()),
            "http://localhost:8000",
        );
        state.load("en").await.unwrap();

        assert_eq!(
            state.load("fr").await,
            Err(ClientError::Request {
                status: 400,
                status_text: "Bad Request".into()
            })
        );
        assert_eq!(state.locale().as_deref(), Some("en"));
        assert_eq!(state.get("mxxn.a"), Some(Value::from("b")));
    }
}
