//! Tracks which output files of one media object are complete.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Output files attempted for a single media object.
///
/// An entry exists iff a download was attempted for that file name while
/// processing the current object. It is `true` iff the verified file exists
/// at `base_dir/name`.
#[derive(Debug, Clone)]
pub struct TargetLocations {
    base_dir: PathBuf,
    entries: HashMap<String, bool>,
}

impl TargetLocations {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entries: HashMap::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records `file_name` as pending and returns its final path.
    pub fn register(&mut self, file_name: &str) -> PathBuf {
        self.entries.insert(file_name.to_string(), false);
        self.base_dir.join(file_name)
    }

    /// Marks a registered file as complete.
    pub fn mark_completed(&mut self, file_name: &str) {
        match self.entries.get_mut(file_name) {
            Some(done) => *done = true,
            None => {
                debug_assert!(false, "mark_completed for unregistered file {}", file_name);
                error!(file = %file_name, "Marked an unregistered file as completed");
            }
        }
    }

    pub fn is_completed(&self, file_name: &str) -> bool {
        self.entries.get(file_name).copied().unwrap_or(false)
    }

    pub fn completed_files(&self) -> Vec<&str> {
        self.files_where(true)
    }

    pub fn pending_files(&self) -> Vec<&str> {
        self.files_where(false)
    }

    fn files_where(&self, done: bool) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, d)| **d == done)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Removes every pending file from disk. Missing files are not an error.
    ///
    /// Returns the paths that were actually removed.
    pub async fn delete_incomplete(&self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for name in self.pending_files() {
            let path = self.base_dir.join(name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed incomplete file");
                    removed.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove incomplete file");
                }
            }
        }
        removed
    }
}
