//! # Colony Common Library
//!
//! Shared code for the colony server and the spreadsheet importer:
//! - Database schema, models and queries
//! - Configuration and root folder resolution
//! - Password hashing
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod password;

pub use error::{Error, Result};
