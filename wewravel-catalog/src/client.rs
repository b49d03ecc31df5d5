use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wewravel_core::{guarded, CoreError, TripRepository};
use wewravel_shared::{Trip, TripId};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to fetch trips: {0}")]
    FetchFailed(String),

    #[error("Trip {0} not found")]
    NotFound(TripId),

    #[error("Catalog request cancelled")]
    Cancelled,
}

/// Single-shot reads against the trip catalog: no cache, no retry.
#[derive(Clone)]
pub struct CatalogClient {
    repo: Arc<dyn TripRepository>,
}

impl CatalogClient {
    pub fn new(repo: Arc<dyn TripRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_trips(&self, cancel: &CancellationToken) -> Result<Vec<Trip>, CatalogError> {
        let trips = guarded(cancel, self.repo.list_trips())
            .await
            .map_err(|e| Self::classify(e, None))?;
        info!("Fetched {} trips", trips.len());
        Ok(trips)
    }

    pub async fn get_trip(&self, id: TripId, cancel: &CancellationToken) -> Result<Trip, CatalogError> {
        guarded(cancel, self.repo.get_trip(id))
            .await
            .map_err(|e| Self::classify(e, Some(id)))
    }

    /// Trips whose title or location contains `term`, in catalog order.
    pub async fn search(&self, term: &str, cancel: &CancellationToken) -> Result<Vec<Trip>, CatalogError> {
        let trips = self.list_trips(cancel).await?;
        Ok(trips.into_iter().filter(|trip| trip.matches(term)).collect())
    }

    fn classify(err: CoreError, id: Option<TripId>) -> CatalogError {
        match (err, id) {
            (CoreError::Cancelled, _) => CatalogError::Cancelled,
            (CoreError::NotFound(_), Some(id)) => CatalogError::NotFound(id),
            (CoreError::StatusError { status: 404, .. }, Some(id)) => CatalogError::NotFound(id),
            (other, _) => {
                warn!("Catalog fetch failed: {}", other);
                CatalogError::FetchFailed(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wewravel_core::InMemoryBackend;

    #[tokio::test]
    async fn lists_and_fetches_by_id() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let client = CatalogClient::new(backend.clone());
        let cancel = CancellationToken::new();

        assert_eq!(client.list_trips(&cancel).await.unwrap().len(), 1);
        assert_eq!(client.get_trip(1, &cancel).await.unwrap().id, 1);
        assert!(matches!(client.get_trip(99, &cancel).await, Err(CatalogError::NotFound(99))));
        assert_eq!(backend.calls().get_trip, 2);
    }

    #[tokio::test]
    async fn failures_are_not_retried() {
        let backend = Arc::new(InMemoryBackend::seeded());
        backend.take_catalog_offline();
        let client = CatalogClient::new(backend.clone());

        let err = client.list_trips(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailed(_)));
        assert_eq!(backend.calls().list_trips, 1);
    }

    #[tokio::test]
    async fn cancelled_view_issues_no_request() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let client = CatalogClient::new(backend.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(client.list_trips(&cancel).await, Err(CatalogError::Cancelled)));
        assert_eq!(backend.calls().list_trips, 0);
    }

    #[tokio::test]
    async fn search_filters_by_location() {
        let client = CatalogClient::new(Arc::new(InMemoryBackend::seeded()));
        let cancel = CancellationToken::new();
        assert_eq!(client.search("himachal", &cancel).await.unwrap().len(), 1);
        assert!(client.search("goa", &cancel).await.unwrap().is_empty());
    }
}
