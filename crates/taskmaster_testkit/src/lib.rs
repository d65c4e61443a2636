//! # Taskmaster Testkit
//!
//! Test utilities for Taskmaster.
//!
//! This crate provides:
//! - Store fixtures backed by memory or a temporary directory
//! - Property-based generators for records and transfer documents
//!
//! ## Usage
//!
//! ```
//! use taskmaster_testkit::prelude::*;
//!
//! with_sample_store(|store| {
//!     assert_eq!(store.counts().projects, 3);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
