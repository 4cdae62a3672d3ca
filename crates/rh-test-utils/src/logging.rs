// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-test log files
//!
//! Every test that uses [`TestLogger`] writes its full trace to its own file
//! under `target/test-logs/<date>/`. Passing tests print one line; failing
//! tests print where the log is so it can be opened directly.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Overrides the directory test logs are written to
pub const TEST_LOG_DIR_VAR: &str = "RH_TEST_LOG_DIR";

#[derive(Error, Debug)]
pub enum TestLogError {
    #[error("Test log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize value for test log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid test name: {name}")]
    InvalidTestName { name: String },
}

pub struct TestLogger {
    log_path: PathBuf,
    writer: BufWriter<File>,
    test_name: String,
    start_time: DateTime<Utc>,
}

impl TestLogger {
    /// Create a logger writing to a fresh file for `test_name`
    ///
    /// ```rust
    /// use rh_test_utils::TestLogger;
    ///
    /// let mut logger = TestLogger::new("test_example").unwrap();
    /// logger.log("patching document").unwrap();
    /// logger.finish_success().unwrap();
    /// ```
    pub fn new(test_name: &str) -> Result<Self, TestLogError> {
        validate_test_name(test_name)?;

        let log_path = create_unique_test_log(test_name)?;
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&log_path)?;

        let mut logger = Self {
            log_path,
            writer: BufWriter::new(file),
            test_name: test_name.to_string(),
            start_time: Utc::now(),
        };
        logger.write_header()?;
        Ok(logger)
    }

    pub fn log(&mut self, message: &str) -> Result<(), TestLogError> {
        let timestamp = Utc::now().format("%H:%M:%S%.3f");
        writeln!(self.writer, "[{}] {}", timestamp, message)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a labelled value as pretty-printed JSON
    pub fn log_json<T: serde::Serialize>(&mut self, label: &str, data: &T) -> Result<(), TestLogError> {
        let json = serde_json::to_string_pretty(data)?;
        self.log(&format!("{}: {}", label, json))
    }

    /// Close the log and print a one-line success marker
    pub fn finish_success(mut self) -> Result<PathBuf, TestLogError> {
        let elapsed = self.elapsed_secs();
        self.log(&format!("Test completed successfully in {:.3}s", elapsed))?;
        self.writer.flush()?;

        println!("✅ {} passed", self.test_name);
        Ok(self.log_path)
    }

    /// Close the log and print its path and size
    pub fn finish_failure(mut self, error_message: &str) -> Result<PathBuf, TestLogError> {
        let elapsed = self.elapsed_secs();
        self.log(&format!("Test failed after {:.3}s: {}", elapsed, error_message))?;
        self.writer.flush()?;

        match fs::metadata(&self.log_path) {
            Ok(metadata) => println!(
                "❌ {} failed - Log: {} ({} bytes)",
                self.test_name,
                self.log_path.display(),
                metadata.len()
            ),
            Err(_) => println!("❌ {} failed - Log: {}", self.test_name, self.log_path.display()),
        }
        Ok(self.log_path)
    }

    fn elapsed_secs(&self) -> f64 {
        Utc::now().signed_duration_since(self.start_time).num_milliseconds() as f64 / 1000.0
    }

    fn write_header(&mut self) -> Result<(), TestLogError> {
        writeln!(self.writer, "=== rest-harness test log ===")?;
        writeln!(self.writer, "Test: {}", self.test_name)?;
        writeln!(self.writer, "Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(self.writer, "Process: {}", std::process::id())?;
        if let Some(thread_name) = std::thread::current().name() {
            writeln!(self.writer, "Thread: {}", thread_name)?;
        }
        writeln!(self.writer, "=== Log Output ===")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Unique log file path for `test_name`
///
/// Files land in `$RH_TEST_LOG_DIR/<date>/` when the variable is set, else in
/// `target/test-logs/<date>/` of the enclosing workspace. The name combines
/// the sanitized test name, the time and a UUID.
pub fn create_unique_test_log(test_name: &str) -> Result<PathBuf, TestLogError> {
    let now = Utc::now();
    let base = match env::var_os(TEST_LOG_DIR_VAR) {
        Some(dir) => PathBuf::from(dir),
        None => find_workspace_root()?.join("target").join("test-logs"),
    };
    let log_dir = base.join(now.format("%Y-%m-%d").to_string());
    fs::create_dir_all(&log_dir)?;

    let filename = format!(
        "{}-{}-{}.log",
        sanitize_filename(test_name),
        now.format("%H-%M-%S"),
        Uuid::new_v4()
    );
    Ok(log_dir.join(filename))
}

/// Nearest ancestor directory whose Cargo.toml declares a workspace
fn find_workspace_root() -> Result<PathBuf, TestLogError> {
    let current_dir = env::current_dir()?;

    for dir in current_dir.ancestors() {
        let cargo_toml = dir.join("Cargo.toml");
        if let Ok(content) = fs::read_to_string(&cargo_toml) {
            if content.contains("[workspace]") {
                return Ok(dir.to_path_buf());
            }
        }
    }
    Ok(current_dir)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

fn validate_test_name(name: &str) -> Result<(), TestLogError> {
    if name.is_empty() {
        return Err(TestLogError::InvalidTestName {
            name: name.to_string(),
        });
    }
    if name.len() > 200 {
        return Err(TestLogError::InvalidTestName {
            name: format!("Name too long: {} chars", name.len()),
        });
    }
    Ok(())
}
