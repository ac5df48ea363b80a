use crate::geo::GeoResolver;
use std::sync::Arc;

pub struct AppState {
    pub resolver: Arc<GeoResolver>,
}
