use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::marker::domain::Marker;
use crate::marker::repository::MarkerRepository;

/// Marker business service independent of web framework.
///
/// Every operation forwards to the repository; the only local rule is that
/// `get_by_id` turns a missing marker into [`ServiceError::NotFound`].
pub struct MarkerService<R: MarkerRepository + ?Sized = dyn MarkerRepository> {
    repo: Arc<R>,
}

impl<R: MarkerRepository + ?Sized> MarkerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Marker>, ServiceError> {
        let all = self.repo.find_all().await?;
        debug!(count = all.len(), "listed markers");
        Ok(all)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Marker, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("marker {id} not found")))
    }

    /// Persist a new marker; any client supplied id is discarded.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::marker::{repo::JsonFileMarkerRepository, Marker, MarkerService, MarkerType};
    /// let svc = tokio_test::block_on(async {
    ///     MarkerService::new(Arc::new(JsonFileMarkerRepository::in_memory().await))
    /// });
    /// let stored = tokio_test::block_on(svc.add(Marker::new(MarkerType::Plothole, 1.0, 2.0))).unwrap();
    /// assert_eq!(stored.id, Some(1));
    /// ```
    #[instrument(skip(self, marker), fields(kind = marker.kind.as_str()))]
    pub async fn add(&self, mut marker: Marker) -> Result<Marker, ServiceError> {
        marker.id = None;
        let stored = self.repo.save(marker).await?;
        info!(id = ?stored.id, "marker added");
        Ok(stored)
    }

    /// Full replacement keyed by `marker.id`; without an id the marker is inserted.
    #[instrument(skip(self, marker), fields(id = ?marker.id))]
    pub async fn update(&self, marker: Marker) -> Result<Marker, ServiceError> {
        let stored = self.repo.save(marker).await?;
        info!("marker updated");
        Ok(stored)
    }

    /// Idempotent: deleting an unknown id succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existed = self.repo.delete_by_id(id).await?;
        info!(existed, "marker deleted");
        Ok(())
    }
}
