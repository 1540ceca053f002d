//! 測試用的假 ffprobe / ffmpeg

#![allow(dead_code)]

use anyhow::{Result, bail};
use crossbeam_channel::Receiver;
use frame_sampler::tools::{ExtractionStatus, FrameExtractor, MediaProber};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeVideo {
    pub duration: Option<f64>,
    pub fps: String,
}

#[derive(Default)]
pub struct FakeMedia {
    videos: Mutex<HashMap<PathBuf, FakeVideo>>,
    pub format_queries: AtomicUsize,
    pub extractions: Mutex<Vec<(PathBuf, f64)>>,
    /// 設定後每次擷取都會等待，直到另一端送出或關閉
    pub gate: Option<Receiver<()>>,
    /// 擷取時直接回傳錯誤，模擬 ffmpeg 無法啟動
    pub fail_launch: bool,
    /// 第 N 次擷取（從 1 起算）回報 ffmpeg 非零結束
    pub error_exit_at: Vec<usize>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立檔案並登記為可探測的影片
    pub fn add_video(&self, path: &Path, duration: f64, fps: &str) {
        self.add_video_with(
            path,
            FakeVideo {
                duration: Some(duration),
                fps: fps.to_string(),
            },
        );
    }

    pub fn add_video_with(&self, path: &Path, video: FakeVideo) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not really a video").unwrap();
        self.register(path, video);
    }

    /// 只登記探測結果，不建立檔案
    pub fn register(&self, path: &Path, video: FakeVideo) {
        self.videos.lock().unwrap().insert(path.to_path_buf(), video);
    }

    pub fn extraction_count(&self) -> usize {
        self.extractions.lock().unwrap().len()
    }

    fn lookup(&self, path: &Path) -> Result<FakeVideo> {
        match self.videos.lock().unwrap().get(path) {
            Some(video) => Ok(video.clone()),
            None => bail!("Invalid data found when processing input"),
        }
    }
}

impl MediaProber for FakeMedia {
    fn format_name(&self, path: &Path) -> Result<String> {
        self.format_queries.fetch_add(1, Ordering::SeqCst);
        self.lookup(path).map(|_| "mov,mp4,m4a,3gp,3g2,mj2".to_string())
    }

    fn duration(&self, path: &Path) -> Result<f64> {
        match self.lookup(path)?.duration {
            Some(duration) => Ok(duration),
            None => bail!("N/A duration"),
        }
    }

    fn frame_rate(&self, path: &Path) -> Result<String> {
        Ok(self.lookup(path)?.fps)
    }
}

impl FrameExtractor for FakeMedia {
    fn extract_frame(
        &self,
        video: &Path,
        position: f64,
        output: &Path,
        _timeout: Duration,
    ) -> Result<ExtractionStatus> {
        if let Some(gate) = &self.gate {
            let _ = gate.recv();
        }
        if self.fail_launch {
            bail!("No such file or directory (os error 2)");
        }
        let mut extractions = self.extractions.lock().unwrap();
        extractions.push((video.to_path_buf(), position));
        if self.error_exit_at.contains(&extractions.len()) {
            return Ok(ExtractionStatus::ExitedWithError(
                "Invalid data found when processing input".to_string(),
            ));
        }
        fs::write(output, b"\xff\xd8\xff\xd9")?;
        Ok(ExtractionStatus::Extracted)
    }
}

pub fn jpg_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|x| x == "jpg"))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}
