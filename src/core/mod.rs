//! Core modules for Interim's persistence layer.
//!
//! The namespaced store facade and its physical backing maps live here,
//! together with the shared error type and SQLite plumbing.

pub mod backing;
pub mod db;
pub mod error;
pub mod store;
