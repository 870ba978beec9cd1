//! unidb Core Types
//!
//! This crate provides the foundational types used throughout the unidb
//! layer:
//! - The `Value` enum covering the SQL scalar domain
//! - Common error-message constants shared between components

pub mod messages;
mod value;

pub use value::*;
