//! Marker module: domain, repository abstraction, storage implementations and service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Coordinates, Marker, MarkerType};
pub use repository::MarkerRepository;
pub use service::MarkerService;
