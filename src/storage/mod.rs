//! Storage layer for travel-ledger
//!
//! Persists a planning session as one JSON file with atomic replacement.

pub mod session;

pub use session::{Session, SessionSnapshot, SessionStore};
