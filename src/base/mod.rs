//! Foundation utilities for the NED resource layer.
//!
//! This module provides the pieces everything else builds on:
//! - [`paths`] - Path canonicalization, prefix tests, and the scoped
//!   working-directory guard
//! - [`pattern`] - Import-pattern matching over dotted qualified names
//!
//! This module has NO dependencies on other ned-resources modules.

pub mod paths;
pub mod pattern;

pub use paths::{canonicalize, is_path_prefix, ScopedDir};
pub use pattern::ImportPattern;
