//! Core types shared across the codebase.

mod error;

pub use error::RelinkError;
