//! Telegram bot handler tree configuration
//!
//! The same handler tree is used by the webhook dispatcher and by the
//! integration tests.

mod callbacks;
mod commands;
mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
