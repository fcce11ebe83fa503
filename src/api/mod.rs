//! API module
//!
//! HTTP adapter over the ledger services.

pub mod middleware;
pub mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
