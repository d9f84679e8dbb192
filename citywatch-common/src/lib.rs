//! # CityWatch Common Library
//!
//! Shared code for the CityWatch portal including:
//! - Database models and queries (complaint record store)
//! - Configuration and data folder resolution
//! - Capability tokens (admin sessions, expiring image access)
//! - Settings table access for triage tunables
//! - Timestamp utilities

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod settings;
pub mod time;

pub use error::{Error, Result};
