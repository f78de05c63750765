use std::{fmt, sync::Arc};

use folio_core::PostgresCatalog;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PostgresCatalog>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
