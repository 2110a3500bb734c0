use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::errors::ServiceError;
use crate::marker::domain::Marker;
use crate::marker::repository::MarkerRepository;
use crate::storage::json_map_store::JsonMapStore;

/// Marker repository on top of [`JsonMapStore`], for running without a database.
///
/// Enforces the same constraints as the `marker` table: coordinate ranges and
/// one marker per coordinate pair.
pub struct JsonFileMarkerRepository {
    store: Arc<JsonMapStore<i64, Marker>>,
    next_id: AtomicI64,
}

impl JsonFileMarkerRepository {
    /// Load (or create) the JSON file at `path`.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::new(path).await?;
        Ok(Self::from_store(store).await)
    }

    pub async fn in_memory() -> Self {
        Self::from_store(JsonMapStore::in_memory()).await
    }

    async fn from_store(store: Arc<JsonMapStore<i64, Marker>>) -> Self {
        let max_id = store.values().await.iter().filter_map(|m| m.id).max().unwrap_or(0);
        Self { store, next_id: AtomicI64::new(max_id + 1) }
    }
}

/// Same order as the database path: coordinate ranges, unknown id, then uniqueness.
fn check_constraints(map: &HashMap<i64, Marker>, marker: &Marker) -> Result<(), ServiceError> {
    let g = marker.geometry;
    models::marker::validate_coordinates(g.latitude, g.longitude)?;
    if let Some(id) = marker.id {
        if !map.contains_key(&id) {
            return Err(ServiceError::NotFound(format!("marker {id} not found")));
        }
    }
    let taken = map.values().any(|other| other.id != marker.id && other.geometry == g);
    if taken {
        return Err(ServiceError::Conflict(format!(
            "a marker already exists at ({}, {})",
            g.latitude, g.longitude
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl MarkerRepository for JsonFileMarkerRepository {
    async fn find_all(&self) -> Result<Vec<Marker>, ServiceError> {
        let mut all = self.store.values().await;
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Marker>, ServiceError> {
        Ok(self.store.get(&id).await)
    }

    async fn save(&self, marker: Marker) -> Result<Marker, ServiceError> {
        self.store
            .update_map(|map| {
                check_constraints(map, &marker)?;
                let requested = marker.id;
                let stored = match requested {
                    Some(_) => marker,
                    None => {
                        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                        marker.with_id(id)
                    }
                };
                if let Some(id) = stored.id {
                    map.insert(id, stored.clone());
                }
                Ok(stored)
            })
            .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        self.store.remove(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::domain::MarkerType;

    #[tokio::test]
    async fn in_memory_crud() -> Result<(), anyhow::Error> {
        let repo = JsonFileMarkerRepository::in_memory().await;
        assert!(repo.find_all().await?.is_empty());

        let a = repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;
        let b = repo.save(Marker::new(MarkerType::DenseTraffic, 3.0, 4.0)).await?;
        assert_eq!((a.id, b.id), (Some(1), Some(2)));
        assert_eq!(repo.find_all().await?, vec![a.clone(), b]);

        let replaced = repo.save(Marker::new(MarkerType::DenseTraffic, 1.0, 2.0).with_id(1)).await?;
        assert_eq!(repo.find_by_id(1).await?, Some(replaced));

        assert!(repo.delete_by_id(1).await?);
        assert!(repo.find_by_id(1).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() -> Result<(), anyhow::Error> {
        let repo = JsonFileMarkerRepository::in_memory().await;
        let a = repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;
        repo.delete_by_id(a.id.unwrap()).await?;
        let b = repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;
        assert_eq!(b.id, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn enforces_constraints() -> Result<(), anyhow::Error> {
        let repo = JsonFileMarkerRepository::in_memory().await;
        repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;

        let dup = repo.save(Marker::new(MarkerType::DenseTraffic, 1.0, 2.0)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let bad = repo.save(Marker::new(MarkerType::Plothole, 0.0, 200.0)).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        let unknown = repo.save(Marker::new(MarkerType::Plothole, 5.0, 5.0).with_id(40)).await;
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_markers_unchanged() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("markers_{}", uuid::Uuid::new_v4()));
        let tmp = dir.join("markers.json");
        let repo = JsonFileMarkerRepository::open(&tmp).await?;
        let kept = repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;

        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        let res = repo.save(Marker::new(MarkerType::DenseTraffic, 3.0, 4.0)).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));
        assert!(repo.delete_by_id(1).await.is_err());
        assert_eq!(repo.find_all().await?, vec![kept]);

        // 写入恢复后同一坐标可以再次添加
        tokio::fs::remove_dir(&tmp).await?;
        let retried = repo.save(Marker::new(MarkerType::DenseTraffic, 3.0, 4.0)).await?;
        assert_eq!(retried.geometry, Marker::new(MarkerType::DenseTraffic, 3.0, 4.0).geometry);
        assert_eq!(repo.find_all().await?.len(), 2);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_id_wins_over_conflict() -> Result<(), anyhow::Error> {
        let repo = JsonFileMarkerRepository::in_memory().await;
        repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;
        let res = repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0).with_id(99)).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn reopen_continues_id_sequence() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("markers_{}.json", uuid::Uuid::new_v4()));
        {
            let repo = JsonFileMarkerRepository::open(&tmp).await?;
            repo.save(Marker::new(MarkerType::Plothole, 1.0, 2.0)).await?;
            repo.save(Marker::new(MarkerType::Plothole, 3.0, 4.0)).await?;
        }
        let repo = JsonFileMarkerRepository::open(&tmp).await?;
        assert_eq!(repo.find_all().await?.len(), 2);
        let c = repo.save(Marker::new(MarkerType::DenseTraffic, 5.0, 6.0)).await?;
        assert_eq!(c.id, Some(3));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
