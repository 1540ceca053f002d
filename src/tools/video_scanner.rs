use super::media::MediaProber;
use super::video_identifier::is_video_file;
use crate::config::FileTypeTable;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 一支待處理的影片以及它在輸出樹中對應的資料夾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTask {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
}

/// 掃描過程中的狀態回報
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    EnteringDirectory { path: PathBuf, depth: usize },
    DepthLimitReached { path: PathBuf, max_depth: usize },
    VideoFound { path: PathBuf },
    EntryError { path: Option<PathBuf>, message: String },
}

/// 遞迴掃描影片並對應到鏡像的輸出資料夾
///
/// - 深度超過 `max_depth` 的資料夾不會被列出
/// - 不跟隨符號連結資料夾（避免循環）
/// - 單一項目或子樹的錯誤只會回報並略過，不會中斷掃描
///
/// 從 `dir` 開始掃描（深度以 `dir` 為 0）；輸出路徑相對於 `scan_root` 計算。
/// 回傳順序即檔案系統列舉的深度優先順序。
pub fn scan_video_tasks<P: MediaProber + ?Sized>(
    dir: &Path,
    scan_root: &Path,
    output_root: &Path,
    max_depth: usize,
    file_type_table: &FileTypeTable,
    prober: &P,
    on_event: &mut dyn FnMut(ScanEvent),
) -> Vec<VideoTask> {
    let mut tasks = Vec::new();

    // 資料夾深度 d 的檔案位於 d + 1，因此多走一層
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .max_depth(max_depth + 1);

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                warn!("無法存取 {:?}: {e}", path);
                on_event(ScanEvent::EntryError {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        let depth = entry.depth();

        if file_type.is_dir() {
            if depth > max_depth {
                info!("已達最大搜尋深度 {max_depth}，略過: {}", entry.path().display());
                on_event(ScanEvent::DepthLimitReached {
                    path: entry.into_path(),
                    max_depth,
                });
            } else {
                on_event(ScanEvent::EnteringDirectory {
                    path: entry.into_path(),
                    depth,
                });
            }
            continue;
        }

        if file_type.is_symlink() {
            // 指向資料夾的連結一律略過；指向檔案的連結視為一般檔案
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() => {
                    debug!("略過符號連結資料夾: {}", entry.path().display());
                    continue;
                }
                Ok(target) if !target.is_file() => continue,
                Ok(_) => {}
                Err(e) => {
                    warn!("無法解析符號連結 {}: {e}", entry.path().display());
                    on_event(ScanEvent::EntryError {
                        path: Some(entry.into_path()),
                        message: e.to_string(),
                    });
                    continue;
                }
            }
        } else if !file_type.is_file() {
            continue;
        }

        if !is_video_file(entry.path(), file_type_table, prober) {
            continue;
        }

        let output_dir = mirrored_output_dir(entry.path(), scan_root, output_root);
        on_event(ScanEvent::VideoFound {
            path: entry.path().to_path_buf(),
        });
        tasks.push(VideoTask {
            source_path: entry.into_path(),
            output_dir,
        });
    }

    tasks
}

/// `scan_root/a/b/v.mp4` -> `output_root/a/b`
fn mirrored_output_dir(video_path: &Path, scan_root: &Path, output_root: &Path) -> PathBuf {
    let relative = video_path
        .parent()
        .and_then(|dir| dir.strip_prefix(scan_root).ok())
        .filter(|rel| !rel.as_os_str().is_empty());

    match relative {
        Some(rel) => output_root.join(rel),
        None => output_root.to_path_buf(),
    }
}
