use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{ClientError, Event, EventBus, EventType, Transport, api_url};

/// The active theme.
pub struct ThemeState {
    transport: Arc<dyn Transport>,
    bus: Arc<EventBus>,
    base_url: String,
    current: RwLock<Option<(String, Value)>>,
}

impl ThemeState {
    pub fn new(transport: Arc<dyn Transport>, bus: Arc<EventBus>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            bus,
            base_url: base_url.into(),
            current: RwLock::new(None),
        }
    }

    /// Id of the loaded theme.
    pub fn id(&self) -> Option<String> {
        self.current.read().as_ref().map(|(id, _)| id.clone())
    }

    /// The loaded theme document, `Value::Null` before the first load.
    pub fn theme(&self) -> Value {
        self.current
            .read()
            .as_ref()
            .map(|(_, theme)| theme.clone())
            .unwrap_or(Value::Null)
    }

    /// Fetch a theme and make it the active one.
    ///
    /// A 204 answer means the theme does not exist and counts as failure.
    pub async fn load(&self, id: &str) -> Result<(), ClientError> {
        let url = api_url(&self.base_url, &["mxxn", "themes", id])?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() || response.status == 204 {
            return Err(ClientError::ThemeLoad(format!(
                "The theme {} could not be loaded ({} {}).",
                id, response.status, response.status_text
            )));
        }

        let theme: Value = serde_json::from_str(&response.body)
            .map_err(|e| ClientError::ThemeLoad(format!("Invalid theme document: {}", e)))?;

        *self.current.write() = Some((id.to_string(), theme.clone()));
        debug!("Theme {} loaded", id);

        self.bus
            .publish(Event::new(EventType::ThemeChanged, theme))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;

    const URL: &str = "http://localhost:8000/app/mxxn/themes/";

    fn state(transport: MockTransport) -> (ThemeState, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        (
            ThemeState::new(transport.shared(), bus.clone(), "http://localhost:8000/"),
            bus,
        )
    }

    #[tokio::test]
    async fn test_load_publishes_theme() {
        let (state, bus) = state(
            MockTransport::default().with(&format!("{}dark", URL), 200, r#"{"mxxn":{"a":1}}"#),
        );

        state.load("dark").await.unwrap();

        assert_eq!(state.id().as_deref(), Some("dark"));
        assert_eq!(state.theme()["mxxn"]["a"], 1);
        assert_eq!(bus.history_by_type(EventType::ThemeChanged).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_state() {
        let (state, bus) = state(
            MockTransport::default()
                .with(&format!("{}dark", URL), 200, r#"{"mxxn":{}}"#)
                .with(&format!("{}missing", URL), 204, "")
                .with(&format!("{}broken", URL), 500, ""),
        );
        state.load("dark").await.unwrap();

        for id in ["missing", "broken", "unknown"] {
            assert!(matches!(state.load(id).await, Err(ClientError::ThemeLoad(_))));
        }

        assert_eq!(state.id().as_deref(), Some("dark"));
        assert_eq!(bus.history().len(), 1);
    }

    #[tokio::test]
    async fn test_load_encodes_id() {
        let (state, _bus) = state(MockTransport::default().with(
            &format!("{}high%20contrast%231", URL),
            200,
            r#"{"mxxn":{}}"#,
        ));

        state.load("high contrast#1").await.unwrap();
        assert_eq!(state.id().as_deref(), Some("high contrast#1"));

        assert!(matches!(state.load("a/b c").await, Err(ClientError::ThemeLoad(_))));
    }
}
