//! # Tarkib Support
//!
//! Shared utilities for the Tarkib resolver crates.
//!
//! This crate provides:
//! - Key shortening for namespaced string keys
//! - "Did you mean?" suggestion scoring for error messages

pub mod keys;

pub use keys::{shorten_key, suggest_similar};
