//! Shared test utilities for the historic store.
//!
//! Fixtures for serials and timestamps, builders for configurations, and mock
//! stores that fail in specific ways.

#![cfg(test)]

pub mod builders;
pub mod fixtures;
pub mod mocks;
