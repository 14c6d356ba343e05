use crate::utils::error::Result;
use std::path::Path;

/// 檔案存取的接縫；正式環境用 `LocalStorage`，測試用記憶體實作
pub trait Storage {
    fn is_regular_file(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// 檔案必須同時可讀可寫
    fn check_access(&self, path: &Path) -> Result<()>;
    /// 先寫入同目錄的暫存檔，再以 rename 原子地取代原檔
    fn replace_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}
