use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Marker kinds accepted by the `kind` column.
pub const KINDS: [&str; 2] = ["plothole", "dense_traffic"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marker")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_kind(kind: &str) -> Result<(), errors::ModelError> {
    if !KINDS.contains(&kind) {
        return Err(errors::ModelError::Validation(format!("unknown marker kind '{kind}'")));
    }
    Ok(())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), errors::ModelError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(errors::ModelError::Validation("latitude must be within [-90, 90]".into()));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(errors::ModelError::Validation("longitude must be within [-180, 180]".into()));
    }
    Ok(())
}

/// All markers ordered by id.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Insert a marker; the database assigns the id.
pub async fn create(
    db: &DatabaseConnection,
    kind: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Model, errors::ModelError> {
    validate_kind(kind)?;
    validate_coordinates(latitude, longitude)?;

    let am = ActiveModel {
        id: NotSet,
        kind: Set(kind.to_string()),
        latitude: Set(latitude),
        longitude: Set(longitude),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite every column of an existing marker. `None` when the id is unknown.
pub async fn replace(
    db: &DatabaseConnection,
    id: i64,
    kind: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Option<Model>, errors::ModelError> {
    validate_kind(kind)?;
    validate_coordinates(latitude, longitude)?;

    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.kind = Set(kind.to_string());
    am.latitude = Set(latitude);
    am.longitude = Set(longitude);
    match am.update(db).await {
        Ok(m) => Ok(Some(m)),
        // deleted between the lookup and the update
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete by id; returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
