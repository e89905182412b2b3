use std::path::PathBuf;

use tempfile::TempDir;

/// Isolated directory for config-file tests.
pub struct ConfigFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl ConfigFixture {
    /// # Panics
    ///
    /// If the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Write `content` to `relative_path` under the fixture root.
    ///
    /// # Panics
    ///
    /// If the file cannot be written.
    pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}
