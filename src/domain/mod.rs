//! Domain layer for the exploration statistics engine
//!
//! This module contains the counter model, the content-model input types,
//! report types and the storage port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
