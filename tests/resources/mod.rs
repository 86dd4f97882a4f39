//! Resource cache integration tests:
//! - folder loading and package inference
//! - two-phase registration and the dependency fixed point
//! - name resolution
//! - the cache facade

pub mod tests_cache;
pub mod tests_loader;
pub mod tests_registration;
