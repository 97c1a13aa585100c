//! Web server module
//!
//! Thin HTTP boundary over the search service.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
