use super::media::MediaProber;
use crate::config::FileTypeTable;
use log::debug;
use std::path::Path;

/// 判斷檔案是否為可播放的影片
///
/// 先以副檔名快速過濾，再用 ffprobe 確認容器格式；
/// 任何探測失敗都視為「不是影片」，不往上傳遞錯誤。
pub fn is_video_file<P: MediaProber + ?Sized>(
    path: &Path,
    file_type_table: &FileTypeTable,
    prober: &P,
) -> bool {
    if !file_type_table.has_video_extension(path) {
        return false;
    }

    match prober.format_name(path) {
        Ok(format_name) => !format_name.trim().is_empty(),
        Err(e) => {
            debug!("容器探測失敗，略過 {}: {e}", path.display());
            false
        }
    }
}
