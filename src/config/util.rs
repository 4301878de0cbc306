//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from a directory
///
/// Starts from `start` and walks up parent directories until finding
/// `config_name`. Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/app/src/pages/       ← cwd
/// /home/user/app/taro-next.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================
