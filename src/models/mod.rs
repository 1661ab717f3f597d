//! Data models for the MAXbuddy request board.
//!
//! Field names are camelCase on the wire to match what the browser client sends and reads.

mod document;
mod request;
mod user;

pub use document::*;
pub use request::*;
pub use user::*;
