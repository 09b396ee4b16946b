//! Dancesport application system backend.
//!
//! Accounts and reference data are consumed through repository traits; the partnership request
//! workflow in [`partnership`] is the only component with lifecycle rules of its own.

pub mod account;
pub mod config;
pub mod error;
pub mod partnership;
pub mod store;
pub mod telemetry;
