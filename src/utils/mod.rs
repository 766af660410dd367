//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `splitsub` application.
//!
//! This module centralizes reusable components, such as the error types and
//! logging setup, to keep them consistent between the library and binary.

pub mod error;
pub mod logging;

pub use error::{ResolverError, SeedError, StoreError};
