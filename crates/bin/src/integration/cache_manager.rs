//! Default filesystem locations for the metrics cache.
//!
//! Uses platform-specific cache directories:
//! - Linux: `~/.cache/hobart/`
//! - macOS: `~/Library/Caches/hobart/`
//! - Windows: `%LOCALAPPDATA%\hobart\cache\`

use std::path::PathBuf;

/// Get the default cache directory path.
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hobart")
}
