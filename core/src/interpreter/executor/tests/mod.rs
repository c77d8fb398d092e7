//! Tests for the executor
//!
//! Organized by feature area

mod error_tests;
mod helpers;
