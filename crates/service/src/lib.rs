//! Service layer for the marker resource.
//! - `marker::service::MarkerService` exposes the endpoint operations.
//! - `marker::repository::MarkerRepository` abstracts storage; SeaORM and JSON-file
//!   implementations live under `marker::repo`.

pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod marker;
