//! Client-side state of a mxxn application
//!
//! The state wrappers fetch themes, strings and icons from the REST API of a
//! running server and notify subscribers through the [`EventBus`] when their
//! state changes. Every `load` call issues exactly one request; a failed
//! request leaves the previous state untouched.
//!
//! ```text
//! ThemeState / StringsState / IconLoader ──→ Transport (HTTP, mockable)
//!            └──→ EventBus (theme.changed, strings.changed)
//! ```

mod events;
mod icons;
mod strings;
mod theme;
mod transport;

pub use events::{Event, EventBus, EventHandler, EventType};
pub use icons::IconLoader;
pub use strings::StringsState;
pub use theme::ThemeState;
pub use transport::{HttpTransport, Transport, TransportResponse};

use std::fmt;

// ============ ClientError ============

/// Errors of the client state wrappers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The theme could not be loaded
    ThemeLoad(String),
    /// The server answered with a non-2xx status
    Request { status: u16, status_text: String },
    /// The icon could not be loaded
    IconLoad(String),
    /// The request did not reach the server
    Transport(String),
    /// The response body is not the expected document
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::ThemeLoad(msg) => write!(f, "Theme load error: {}", msg),
            ClientError::Request {
                status,
                status_text,
            } => write!(f, "Request error: {} {}", status, status_text),
            ClientError::IconLoad(msg) => write!(f, "Icon load error: {}", msg),
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// `<base>/app/<segments>` with every segment percent-encoded.
pub(crate) fn api_url(base_url: &str, segments: &[&str]) -> Result<String, ClientError> {
    let invalid = || ClientError::Transport(format!("Invalid base URL {}.", base_url));

    let mut url = url::Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push("app")
        .extend(segments);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(
            api_url("http://localhost:8000/", &["mxxn", "themes", "dark"]).unwrap(),
            "http://localhost:8000/app/mxxn/themes/dark"
        );
        assert_eq!(
            api_url("http://localhost/prefix", &["mxxn", "icons", "a b#c/d"]).unwrap(),
            "http://localhost/prefix/app/mxxn/icons/a%20b%23c%2Fd"
        );
        assert!(matches!(
            api_url("localhost", &["mxxn"]),
            Err(ClientError::Transport(_))
        ));
    }
}
