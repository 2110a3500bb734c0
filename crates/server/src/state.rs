use std::sync::Arc;

use service::marker::MarkerService;

#[derive(Clone)]
pub struct AppState {
    pub markers: Arc<MarkerService>,
}

impl AppState {
    pub fn new(markers: MarkerService) -> Self {
        Self { markers: Arc::new(markers) }
    }
}
