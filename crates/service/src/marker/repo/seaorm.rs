use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::marker::domain::{Coordinates, Marker};
use crate::marker::repository::MarkerRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmMarkerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmMarkerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl MarkerRepository for SeaOrmMarkerRepository {
    async fn find_all(&self) -> Result<Vec<Marker>, ServiceError> {
        models::marker::find_all(&self.db)
            .await?
            .into_iter()
            .map(Marker::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Marker>, ServiceError> {
        models::marker::find(&self.db, id).await?.map(Marker::try_from).transpose()
    }

    async fn save(&self, marker: Marker) -> Result<Marker, ServiceError> {
        let kind = marker.kind.as_str();
        let Coordinates { latitude, longitude } = marker.geometry;
        let stored = match marker.id {
            None => models::marker::create(&self.db, kind, latitude, longitude).await?,
            Some(id) => models::marker::replace(&self.db, id, kind, latitude, longitude)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("marker {id} not found")))?,
        };
        Marker::try_from(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(models::marker::delete(&self.db, id).await?)
    }
}
