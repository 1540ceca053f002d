use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    /// 僅依副檔名判斷（不呼叫 ffprobe）
    #[must_use]
    pub fn has_video_extension(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 擷取流程的預設參數
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// 目錄遞迴的最大深度（掃描根目錄為 0）
    pub max_depth: usize,
    /// 單張截圖的 ffmpeg 等待上限
    pub frame_timeout: Duration,
    /// 截圖間隔下限（秒）
    pub min_interval: f64,
    /// 截圖數量不可超過總幀數的比例
    pub adjustment_ratio: f64,
    /// JPEG 品質 (1-31，數字越小品質越高)
    pub jpeg_quality: u8,
    pub default_frame_count: usize,
    pub max_frame_count: usize,
    pub ffprobe_binary: String,
    pub ffmpeg_binary: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_depth: 10,
            frame_timeout: Duration::from_secs(10),
            min_interval: 0.1,
            adjustment_ratio: 0.8,
            jpeg_quality: 2,
            default_frame_count: 8,
            max_frame_count: 1000,
            ffprobe_binary: "ffprobe".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    EnUs,
    ZhCn,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhCn => "zh-CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhCn => write!(f, "简体中文"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: ExtractorSettings,
    pub language: Language,
}
