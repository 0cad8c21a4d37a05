//! Web layer for the opportunity finder.
//!
//! Serves the ranked opportunities as an HTML page and as JSON.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::{AppState, FeedCache};
pub use templates::*;
