use crate::config::Config;
use crate::store::Workbook;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The workbook sits behind a single process-wide mutex: every request
/// holds it for its whole lifetime, which is what makes the
/// check-then-append duplicate guard and the additive header migration
/// safe against concurrent requests. Guard drop releases it on every
/// exit path, error branches included.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Workbook>>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Workbook, config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
        }
    }
}
