use crate::models::Item;
use std::time::Duration;
use thiserror::Error;

/// Errors from the remote catalog source.
///
/// A failure never crosses the state machine boundary as an error object;
/// the dispatch layer consumes it and surfaces only the Failed phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Simulated remote catalog source.
///
/// Network protocol design is out of scope; the fetch is a single opaque
/// async operation that resolves exactly once per invocation, either with the
/// full item list or with a [`FetchError`]. The delay emulates an HTTP
/// round trip.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    delay: Duration,
    failing: bool,
}

impl CatalogClient {
    /// Client with the default one second round-trip delay.
    pub fn new() -> Self {
        Self {
            delay: Duration::from_secs(1),
            failing: false,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            failing: false,
        }
    }

    /// A client whose fetches reject, for exercising the failure path.
    pub fn failing() -> Self {
        Self {
            delay: Duration::ZERO,
            failing: true,
        }
    }

    /// Fetch the catalog from the simulated remote source.
    pub async fn fetch_catalog(&self) -> Result<Vec<Item>, FetchError> {
        tokio::time::sleep(self.delay).await;

        if self.failing {
            tracing::warn!("Simulated catalog outage");
            return Err(FetchError::Unavailable("simulated outage".to_string()));
        }

        let catalog = sample_catalog();
        tracing::debug!("Fetched {} catalog items", catalog.len());
        Ok(catalog)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in catalog served by the simulated source.
pub fn sample_catalog() -> Vec<Item> {
    vec![
        Item::new(1, "Super Mario Bros.", 1985),
        Item::new(2, "Super Mario World", 1990),
        Item::new(3, "Mario Bros.", 1984),
        Item::new(4, "The Legend of Zelda", 1985),
        Item::new(5, "Metroid", 1987),
        Item::new(6, "Mega Man 2", 1988),
        Item::new(7, "Tetris", 1989),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_has_stable_identities() {
        let catalog = sample_catalog();

        assert_eq!(catalog.len(), 7);
        let mut ids: Vec<u64> = catalog.iter().map(|item| item.object_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[tokio::test]
    async fn test_fetch_resolves_with_catalog() {
        let client = CatalogClient::with_delay(Duration::ZERO);
        let result = client.fetch_catalog().await.unwrap();

        assert_eq!(result, sample_catalog());
    }

    #[tokio::test]
    async fn test_failing_client_rejects() {
        let client = CatalogClient::failing();
        let result = client.fetch_catalog().await;

        assert_eq!(
            result,
            Err(FetchError::Unavailable("simulated outage".to_string()))
        );
    }
}
