//! Business logic services for the Invoicer platform
//!
//! Services validate input, run the calculations and call the store. Every
//! operation takes the owner's user id explicitly.

pub mod company;
pub mod customer;
pub mod export;
pub mod invoice;

pub use company::CompanyService;
pub use customer::CustomerService;
pub use export::{export_to_csv, InvoiceCsvRow};
pub use invoice::{DraftTemplate, InvoiceService};
