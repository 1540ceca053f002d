use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 可重複呼叫；已存在的資料夾不會出錯
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

/// 預設輸出位置：輸入資料夾旁的 `<名稱>_output`
#[must_use]
pub fn suggest_output_directory(input_dir: &Path) -> PathBuf {
    let folder_name = input_dir
        .file_name()
        .map_or_else(|| "videos".to_string(), |n| n.to_string_lossy().to_string());
    let parent = input_dir.parent().unwrap_or(Path::new("."));
    parent.join(format!("{folder_name}_output"))
}
