use std::sync::Arc;

use super::{ClientError, Transport, api_url};

/// Fetches SVG icons of the framework.
pub struct IconLoader {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl IconLoader {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// The SVG document of an icon.
    pub async fn load(&self, name: &str) -> Result<String, ClientError> {
        let url = api_url(&self.base_url, &["mxxn", "icons", name])?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(ClientError::IconLoad(format!(
                "The icon {} could not be loaded ({} {}).",
                name, response.status, response.status_text
            )));
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;

    #[tokio::test]
    async fn test_load() {
        let transport = MockTransport::default()
            .with("http://localhost/app/mxxn/icons/menu", 200, "<svg/>")
            .shared();
        let loader = IconLoader::new(transport.clone(), "http://localhost");

        assert_eq!(loader.load("menu").await.unwrap(), "<svg/>");
        assert!(matches!(loader.load("nope").await, Err(ClientError::IconLoad(_))));
        assert_eq!(transport.requests.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_load_encodes_name() {
        let transport = MockTransport::default().shared();
        let loader = IconLoader::new(transport.clone(), "http://localhost");

        assert!(matches!(loader.load("arrow left#").await, Err(ClientError::IconLoad(_))));
        assert_eq!(
            transport.requests.lock().as_slice(),
            ["http://localhost/app/mxxn/icons/arrow%20left%23"]
        );
    }
}
