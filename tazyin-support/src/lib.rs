//! # Tazyin Support
//!
//! Shared helpers for the Tazyin crates.
//!
//! This crate provides:
//! - Short, readable type names for log fields and error messages
//! - "Did you mean?" suggestions when a service is missing

pub mod rendering;
