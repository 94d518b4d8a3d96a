//! Application paths for persistent data.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application paths.
pub struct AppPaths {
    /// Data directory.
    pub data: PathBuf,
}

impl AppPaths {
    /// Create paths for the chatline application.
    #[must_use]
    pub fn new() -> Self {
        ProjectDirs::from("com", "g3dox", "chatline").map_or_else(
            || {
                // Fallback to home directory
                let home = directories::BaseDirs::new()
                    .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
                Self {
                    data: home.join(".local/share/chatline"),
                }
            },
            |proj_dirs| Self {
                data: proj_dirs.data_dir().to_path_buf(),
            },
        )
    }

    /// Path to the history database file.
    #[must_use]
    pub fn history_db_file(&self) -> PathBuf {
        self.data.join("history.sqlite")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_db_lives_under_data_dir() {
        let paths = AppPaths::new();
        let db = paths.history_db_file();
        assert!(db.starts_with(&paths.data));
        assert_eq!(db.file_name().unwrap(), "history.sqlite");
    }
}
