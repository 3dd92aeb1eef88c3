/*!
 * Common test utilities for the yantai test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use yantai::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample chapter file for testing
pub fn create_test_chapter(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "Chapter 1 - The First Step\n\n\
                   The morning fog had not lifted when Akari reached the gate.\n\n\
                   She waited, counting her own heartbeats, until the watchman\n\
                   finally waved her through.\n";
    create_test_file(dir, filename, content)
}

/// Builds a configuration suitable for tests: no request pacing and the
/// session store rooted inside the given directory
pub fn test_config(session_root: &Path) -> Config {
    let mut config = Config::default();
    config.translation.common.request_delay_ms = 0;
    config.session.root = Some(session_root.to_path_buf());
    config
}

/// Initializes logging for tests that want visible log output.
/// Safe to call more than once.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
