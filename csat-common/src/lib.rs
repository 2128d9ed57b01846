//! # CSAT Common Library
//!
//! Shared code for the customer satisfaction survey service including:
//! - Survey record model and validation
//! - The nine-metric rating field enumeration
//! - CSV encoding/decoding for the response export format
//! - Wizard state machine driving the multi-step survey flow
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod csv;
pub mod error;
pub mod model;
pub mod wizard;

pub use error::{Error, Result};
pub use model::RatingField;
