use crate::domain::model::ConversionRequest;
use crate::utils::error::Result;
use crate::utils::validation::validate_pattern;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands input paths into the regular files to process.
///
/// Directory entries are visited sorted by file name so that output is
/// reproducible; input paths keep the order they were given in.
pub struct FileWalker {
    recursive: bool,
    follow_symlinks: bool,
    excludes: Vec<Regex>,
}

impl FileWalker {
    pub fn new(request: &ConversionRequest) -> Result<Self> {
        let excludes = request
            .exclude
            .iter()
            .map(|pattern| validate_pattern("exclude", pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            recursive: request.recursive,
            follow_symlinks: request.follow_symlinks,
            excludes,
        })
    }

    pub fn collect(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for input in inputs {
            self.collect_input(input, &mut files);
        }
        files
    }

    fn collect_input(&self, input: &Path, files: &mut Vec<PathBuf>) {
        let metadata = match fs::metadata(input) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Ignoring {}: {}", input.display(), e);
                return;
            }
        };

        if metadata.is_file() {
            if !self.is_excluded(input) {
                files.push(input.to_path_buf());
            }
            return;
        }

        if !metadata.is_dir() {
            tracing::debug!("Ignoring {}: not a regular file", input.display());
            return;
        }

        let mut walker = WalkDir::new(input)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        // 被排除的目錄整棵略過
        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry.path()));

        for entry in entries {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => tracing::warn!("⚠️ Cannot read directory entry: {}", e),
            }
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let text = path.to_string_lossy();
        let excluded = self.excludes.iter().any(|re| re.is_match(&text));
        if excluded {
            tracing::debug!("Excluded by pattern: {}", path.display());
        }
        excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), "c").unwrap();
        fs::write(dir.path().join("sub/deeper/d.txt"), "d").unwrap();
        dir
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_non_recursive_lists_immediate_files_sorted() {
        let dir = tree();
        let walker = FileWalker::new(&ConversionRequest::default()).unwrap();
        let files = walker.collect(&[dir.path().to_path_buf()]);
        assert_eq!(names(dir.path(), &files), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_recursive_lists_all_depths() {
        let dir = tree();
        let request = ConversionRequest {
            recursive: true,
            ..Default::default()
        };
        let files = FileWalker::new(&request)
            .unwrap()
            .collect(&[dir.path().to_path_buf()]);
        assert_eq!(
            names(dir.path(), &files),
            vec!["a.txt", "b.txt", "sub/c.txt", "sub/deeper/d.txt"]
        );
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let dir = tree();
        let request = ConversionRequest {
            recursive: true,
            exclude: vec!["deeper".to_string()],
            ..Default::default()
        };
        let files = FileWalker::new(&request)
            .unwrap()
            .collect(&[dir.path().to_path_buf()]);
        assert_eq!(names(dir.path(), &files), vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn test_file_inputs_and_missing_paths() {
        let dir = tree();
        let file = dir.path().join("b.txt");
        let missing = dir.path().join("missing.txt");
        let walker = FileWalker::new(&ConversionRequest::default()).unwrap();
        let files = walker.collect(&[file.clone(), missing]);
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_rejected() {
        let request = ConversionRequest {
            exclude: vec!["(".to_string()],
            ..Default::default()
        };
        assert!(FileWalker::new(&request).is_err());
    }
}
