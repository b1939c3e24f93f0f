//! Configuration module for travel-ledger
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TravelPaths;
pub use settings::Settings;
