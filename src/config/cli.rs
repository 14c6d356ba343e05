use crate::domain::ports::Storage;
use crate::utils::error::{NormalizeError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn is_regular_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(path)?;
        Ok(data)
    }

    fn check_access(&self, path: &Path) -> Result<()> {
        // 以讀寫模式開啟但不截斷，確認兩種權限都具備
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map(|_| ())
            .map_err(|source| NormalizeError::PermissionError {
                path: path.to_path_buf(),
                source,
            })
    }

    fn replace_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let working_copy_error = |source: std::io::Error| NormalizeError::WorkingCopyError {
            path: path.to_path_buf(),
            source,
        };

        // 符號連結要保留，改寫的是連結指向的實體檔案
        let target = fs::canonicalize(path).map_err(working_copy_error)?;
        let dir = target.parent().unwrap_or(Path::new("."));
        let metadata = fs::metadata(&target).map_err(working_copy_error)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".textnorm-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(working_copy_error)?;
        temp.write_all(data).map_err(working_copy_error)?;
        temp.as_file().sync_all().map_err(working_copy_error)?;
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(working_copy_error)?;

        // rename 是最後一步，失敗時原檔保持不變
        temp.persist(&target)
            .map_err(|e| NormalizeError::PermissionError {
                path: path.to_path_buf(),
                source: e.error,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replace_file_swaps_content_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"old\r\n").unwrap();

        let storage = LocalStorage;
        assert!(storage.is_regular_file(&path));
        storage.check_access(&path).unwrap();
        storage.replace_file(&path, b"new\n").unwrap();

        assert_eq!(storage.read_file(&path).unwrap(), b"new\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_directories_are_not_regular_files() {
        let dir = TempDir::new().unwrap();
        assert!(!LocalStorage.is_regular_file(dir.path()));
        assert!(!LocalStorage.is_regular_file(&dir.path().join("missing")));
    }

    #[test]
    fn test_replace_missing_file_is_working_copy_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.txt");

        let result = LocalStorage.replace_file(&path, b"data\n");

        assert!(matches!(result, Err(NormalizeError::WorkingCopyError { .. })));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_replace_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"echo hi\r\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

        LocalStorage.replace_file(&path, b"echo hi\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
