use std::sync::Arc;

use crate::advisor::SuggestionProvider;
use crate::config::Config;
use crate::editor::store::DocumentStore;
use crate::versions::archive::VersionArchive;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub archive: Arc<VersionArchive>,
    /// `None` while AI suggestions are disabled.
    pub advisor: Option<Arc<dyn SuggestionProvider>>,
    pub config: Config,
}
