//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Stub recognizers and providers
//! - Gazetteer file fixtures
//! - Redaction assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Not every test crate uses both halves.
#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
