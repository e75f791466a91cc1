//! HTTP handlers

pub mod company;
pub mod customer;
pub mod health;
pub mod invoice;

pub use company::*;
pub use customer::*;
pub use health::*;
pub use invoice::*;
