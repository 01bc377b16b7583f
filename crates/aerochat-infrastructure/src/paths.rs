//! Unified path management for Aerochat data files.
//!
//! All Aerochat configuration and conversation data live under the
//! platform's standard directories, resolved once here so every storage
//! component agrees on the layout.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Aerochat.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/aerochat/          # Config directory
/// ├── routing.toml             # Backend routing configuration
/// └── conversations/           # Conversation records (DirConversationStore)
///     └── <conversation-id>.toml
/// ```
pub struct AerochatPaths;

impl AerochatPaths {
    /// Returns the Aerochat configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/aerochat/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("aerochat"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Aerochat data directory, for larger files.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("aerochat"))
            .ok_or(PathError::HomeDirNotFound)
    }
}
