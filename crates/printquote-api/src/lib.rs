//! PrintQuote API Library
//!
//! HTTP surface for the quote pipeline: handlers, error mapping and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
