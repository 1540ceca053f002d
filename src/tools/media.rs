//! 外部影音工具的窄介面
//!
//! 取樣與影片辨識只依賴這些 trait，實際的 ffprobe / ffmpeg 子程序實作
//! 以及測試用的假實作都放在介面之後。

use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// 容器 / 串流資訊查詢
pub trait MediaProber {
    /// 容器格式名稱（例如 `mov,mp4,m4a,3gp,3g2,mj2`）
    fn format_name(&self, path: &Path) -> Result<String>;

    /// 影片長度（秒）
    fn duration(&self, path: &Path) -> Result<f64>;

    /// 原始幀率字串（`"30000/1001"` 或 `"29.97"`），由呼叫端解析
    fn frame_rate(&self, path: &Path) -> Result<String>;
}

/// 單張截圖的執行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    Extracted,
    /// 工具已執行但回傳非零結束碼
    ExitedWithError(String),
    /// 超過等待上限，子程序已被終止
    TimedOut,
}

pub trait FrameExtractor {
    /// 在 `position` 秒處擷取一張圖片到 `output`
    ///
    /// 只有在工具無法啟動等非預期狀況才回傳 `Err`。
    fn extract_frame(
        &self,
        video: &Path,
        position: f64,
        output: &Path,
        timeout: Duration,
    ) -> Result<ExtractionStatus>;
}

/// 可交給背景執行緒使用的完整工具組
pub trait MediaToolkit: MediaProber + FrameExtractor + Send + Sync {}

impl<T> MediaToolkit for T where T: MediaProber + FrameExtractor + Send + Sync {}
