use async_trait::async_trait;

use super::domain::Marker;
use crate::errors::ServiceError;

/// Repository abstraction for marker persistence.
#[async_trait]
pub trait MarkerRepository: Send + Sync {
    /// Every stored marker, ordered by id.
    async fn find_all(&self) -> Result<Vec<Marker>, ServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Marker>, ServiceError>;

    /// Insert when `marker.id` is `None`, otherwise replace the stored marker with
    /// that id. Replacing an unknown id fails with `NotFound`.
    async fn save(&self, marker: Marker) -> Result<Marker, ServiceError>;

    /// Returns whether a marker was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;
}
