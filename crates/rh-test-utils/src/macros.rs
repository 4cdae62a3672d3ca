// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Assertions that record their outcome in a [`TestLogger`](crate::TestLogger)

/// Assert a condition, logging the attempt and its result
///
/// ```rust
/// use rh_test_utils::{logged_assert, TestLogger};
///
/// let mut logger = TestLogger::new("doc_logged_assert").unwrap();
/// logged_assert!(logger, 1 + 1 == 2, "arithmetic holds");
/// ```
#[macro_export]
macro_rules! logged_assert {
    ($logger:expr, $condition:expr) => {
        $crate::logged_assert!($logger, $condition, stringify!($condition))
    };
    ($logger:expr, $condition:expr, $message:expr) => {{
        if let Err(e) = $logger.log(&format!("Asserting: {}", $message)) {
            eprintln!("Warning: Failed to write to test log: {}", e);
        }
        if $condition {
            if let Err(e) = $logger.log("✓ Assertion passed") {
                eprintln!("Warning: Failed to write to test log: {}", e);
            }
        } else {
            if let Err(e) = $logger.log("✗ Assertion failed") {
                eprintln!("Warning: Failed to write to test log: {}", e);
            }
            panic!("Assertion failed: {}", $message);
        }
    }};
}

/// Assert equality, logging both sides on failure
///
/// Each operand is evaluated once.
#[macro_export]
macro_rules! logged_assert_eq {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::logged_assert_eq!($logger, $left, $right, "values differ")
    };
    ($logger:expr, $left:expr, $right:expr, $message:expr) => {{
        if let Err(e) = $logger.log(&format!(
            "Asserting equality: {} == {}",
            stringify!($left),
            stringify!($right)
        )) {
            eprintln!("Warning: Failed to write to test log: {}", e);
        }
        match (&$left, &$right) {
            (left, right) => {
                if *left == *right {
                    if let Err(e) = $logger.log("✓ Equality assertion passed") {
                        eprintln!("Warning: Failed to write to test log: {}", e);
                    }
                } else {
                    let detail = format!(
                        "{}\n  left: `{:?}`,\n right: `{:?}`",
                        $message, left, right
                    );
                    if let Err(e) = $logger.log(&format!("✗ Equality assertion failed: {}", detail)) {
                        eprintln!("Warning: Failed to write to test log: {}", e);
                    }
                    panic!("{}", detail);
                }
            }
        }
    }};
}
