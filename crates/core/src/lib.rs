//! Core library with shared types and error handling.
//!
//! This crate provides reusable components for the announcement service:
//! - Error taxonomy with automatic HTTP response conversion
//! - The `{ ok, data | message }` reply envelope
//! - Validation helpers for client input
//! - `str` extension helpers for blank-as-absent spreadsheet cells

pub mod error;
pub mod reply;
pub mod str_ext;
pub mod validation;

pub use error::{AppError, AppResult};
pub use reply::ApiReply;
pub use str_ext::StrExt;
pub use validation::require_identifier;
