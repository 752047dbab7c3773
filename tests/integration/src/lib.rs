//! Integration tests for nebucloud-sd.
//!
//! Run with: `cargo test --package integration-tests`

#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod load_tests;
#[cfg(test)]
mod registry_tests;
