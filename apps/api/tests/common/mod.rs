//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure for integration tests,
//! including an in-process server, client fixtures and request helpers.

#![allow(unused_imports)]

pub mod helpers;

pub use helpers::*;
