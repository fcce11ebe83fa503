//! Shared handler state

use std::sync::Arc;

use crate::error::AppError;
use crate::reporting::{ErrorReporter, NoopReporter};
use crate::services::Ledger;

/// Ledger services plus the error sink, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    reporter: Arc<dyn ErrorReporter>,
}

impl AppState {
    pub fn new(ledger: Ledger, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { ledger, reporter }
    }

    /// Empty ledger, errors discarded
    pub fn in_memory() -> Self {
        Self::new(Ledger::in_memory(), Arc::new(NoopReporter))
    }

    /// Send a failure to the sink and hand the error back for the response
    pub fn report(&self, err: AppError, message: &str) -> AppError {
        self.reporter.report(Some(&err), message);
        err
    }
}
