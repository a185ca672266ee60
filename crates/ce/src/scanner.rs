//! Page discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

/// Finds pages with a given extension under a root directory.
///
/// Hidden files and directories are skipped, as are files whose path relative
/// to the root matches an exclude pattern.
pub(crate) struct Scanner {
    root: PathBuf,
    extension: &'static str,
    exclude: Vec<Pattern>,
}

impl Scanner {
    pub(crate) fn new(root: PathBuf, extension: &'static str) -> Self {
        Self {
            root,
            extension,
            exclude: Vec::new(),
        }
    }

    /// Skip files matching any of `patterns`.
    pub(crate) fn with_exclude(mut self, patterns: &[String]) -> Result<Self, glob::PatternError> {
        self.exclude = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Page paths relative to the root, sorted.
    ///
    /// Returns an empty Vec if the root directory doesn't exist.
    pub(crate) fn scan(&self) -> Vec<PathBuf> {
        let mut pages = Vec::new();
        if self.root.is_dir() {
            self.scan_directory(&self.root, Path::new(""), &mut pages);
        }
        pages.sort();
        pages
    }

    fn scan_directory(&self, dir: &Path, relative: &Path, pages: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Failed to read directory");
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let child = relative.join(&name);
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&entry.path(), &child, pages);
            } else if child.extension().is_some_and(|e| e == self.extension) {
                if self.is_excluded(&child) {
                    tracing::debug!(path = %child.display(), "Excluded");
                    continue;
                }
                pages.push(child);
            }
        }
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_finds_nested_pages() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "index.md");
        touch(dir.path(), "guide/units.md");
        touch(dir.path(), "guide/image.png");
        touch(dir.path(), ".hidden/secret.md");
        touch(dir.path(), "guide/.draft.md");

        let pages = Scanner::new(dir.path().to_path_buf(), "md").scan();

        assert_eq!(
            pages,
            vec![PathBuf::from("guide/units.md"), PathBuf::from("index.md")]
        );
    }

    #[test]
    fn test_scan_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "drafts/wip.html");
        touch(dir.path(), "api/generated.html");

        let pages = Scanner::new(dir.path().to_path_buf(), "html")
            .with_exclude(&["drafts/**".to_owned(), "api/*.html".to_owned()])
            .unwrap()
            .scan();

        assert_eq!(pages, vec![PathBuf::from("index.html")]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Scanner::new(PathBuf::from("."), "md").with_exclude(&["[".to_owned()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_missing_root() {
        let pages = Scanner::new(PathBuf::from("/nonexistent/ce-embed"), "md").scan();
        assert!(pages.is_empty());
    }
}
