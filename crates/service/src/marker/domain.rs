use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Road condition a marker reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    Plothole,
    DenseTraffic,
}

impl MarkerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::Plothole => "plothole",
            MarkerType::DenseTraffic => "dense_traffic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plothole" => Some(MarkerType::Plothole),
            "dense_traffic" => Some(MarkerType::DenseTraffic),
            _ => None,
        }
    }
}

/// GPS position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Marker as exchanged with clients.
///
/// `id` is assigned by storage; it is ignored on create and required to replace
/// an existing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: MarkerType,
    pub geometry: Coordinates,
}

impl Marker {
    pub fn new(kind: MarkerType, latitude: f64, longitude: f64) -> Self {
        Self { id: None, kind, geometry: Coordinates { latitude, longitude } }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl TryFrom<models::marker::Model> for Marker {
    type Error = ServiceError;

    fn try_from(m: models::marker::Model) -> Result<Self, Self::Error> {
        let kind = MarkerType::parse(&m.kind)
            .ok_or_else(|| ServiceError::Db(format!("marker {} has unknown kind '{}'", m.id, m.kind)))?;
        Ok(Self {
            id: Some(m.id),
            kind,
            geometry: Coordinates { latitude: m.latitude, longitude: m.longitude },
        })
    }
}
