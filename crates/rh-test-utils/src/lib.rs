// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Test utilities for rest-harness
//!
//! - [`TestLogger`] gives each test its own log file
//! - [`JsonFixtures`] builds throwaway resource directories
//! - `logged_assert!` / `logged_assert_eq!` record assertions in the log

pub mod fixtures;
pub mod logging;
pub mod macros;

pub use fixtures::JsonFixtures;
pub use logging::{create_unique_test_log, TestLogError, TestLogger, TEST_LOG_DIR_VAR};
