use std::sync::Arc;

use crate::auth::sessions::SessionStore;
use crate::files::FileIntake;
use crate::store::Store;

/// Collaborators every handler works through, injected as axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub files: FileIntake,
}
