//! Shared types and models for the Invoicer platform
//!
//! This crate contains the domain models, the invoice calculator and the
//! locale-aware formatting shared between the backend and the browser
//! (via WASM).

pub mod calculator;
pub mod document;
pub mod format;
pub mod models;
pub mod types;
pub mod validation;

pub use calculator::*;
pub use document::*;
pub use format::*;
pub use models::*;
pub use types::*;
pub use validation::*;
