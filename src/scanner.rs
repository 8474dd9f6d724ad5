use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::is_manifest_name;

/// Finds book manifests below a directory, respecting `.gitignore`.
pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `book.toml` / `*.book.toml` files, sorted by path.
    #[must_use]
    pub fn manifests(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !matches!(name.as_ref(), "target" | ".git" | "node_modules")
            })
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|e| is_manifest_name(&e.file_name().to_string_lossy()))
            .map(ignore::DirEntry::into_path)
            .collect();
        found.sort();
        tracing::debug!(root = %self.root.display(), count = found.len(), "scanned for manifests");
        found
    }
}
