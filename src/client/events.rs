use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error};

/// The state change notifications of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "theme.changed")]
    ThemeChanged,
    #[serde(rename = "strings.changed")]
    StringsChanged,
}

impl EventType {
    pub fn name(&self) -> &'static str {
        match self {
            EventType::ThemeChanged => "theme.changed",
            EventType::StringsChanged => "strings.changed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    /// The new state.
    pub payload: Value,
}

impl Event {
    pub fn new(event_type: EventType, payload: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Receives the events it is interested in.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn name(&self) -> &str;

    fn interested_events(&self) -> Vec<EventType>;
}

/// In-process publish/subscribe of state changes.
pub struct EventBus {
    handlers: Mutex<HashMap<EventType, Vec<Arc<dyn EventHandler>>>>,
    sender: broadcast::Sender<Event>,
    history: Mutex<VecDeque<Event>>,
    max_history: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventBus {
    pub fn new(max_history: usize) -> Self {
        let (sender, _) = broadcast::channel(256);

        Self {
            handlers: Mutex::new(HashMap::new()),
            sender,
            history: Mutex::new(VecDeque::new()),
            max_history,
        }
    }

    pub fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.lock();

        for event_type in handler.interested_events() {
            handlers
                .entry(event_type)
                .or_default()
                .push(handler.clone());
        }
    }

    pub async fn publish(&self, event: Event) {
        {
            let mut history = self.history.lock();
            history.push_back(event.clone());
            while history.len() > self.max_history {
                history.pop_front();
            }
        }

        // no subscribers
        if self.sender.send(event.clone()).is_err() {
            debug!("No subscriber for {}", event.event_type.name());
        }

        let handlers = self
            .handlers
            .lock()
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            if let Err(e) = handler.handle(&event).await {
                error!("Event handler '{}' failed: {}", handler.name(), e);
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn history(&self) -> Vec<Event> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn history_by_type(&self, event_type: EventType) -> Vec<Event> {
        self.history
            .lock()
            .iter()
            .filter(|event| event.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }
}
