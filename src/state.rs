use std::sync::Arc;

use crate::store::RowStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: RowStore,
}
