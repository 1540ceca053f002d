use super::frame_naming::{frame_file_name, video_stem};
use super::sampling_plan::{SamplingPlan, SamplingPolicy, parse_frame_rate};
use crate::config::ExtractorSettings;
use crate::tools::{ExtractionStatus, MediaToolkit, ensure_directory_exists};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 單支影片取樣失敗的原因
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("無法建立輸出資料夾 {path}: {message}")]
    OutputDir { path: PathBuf, message: String },

    #[error("無法讀取影片資訊 {path}: {message}")]
    Probe { path: PathBuf, message: String },

    #[error("擷取截圖失敗 {path} (第 {index} 張): {message}")]
    Extraction {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

impl SamplerError {
    /// 探測失敗只影響當前影片，其餘錯誤會中止整個工作
    #[must_use]
    pub const fn is_per_video(&self) -> bool {
        matches!(self, Self::Probe { .. })
    }
}

/// 取樣結果
///
/// `fully_succeeded == false` 代表請求數量過多，尚未擷取任何截圖，
/// 呼叫端應以 `effective_count` 重新呼叫。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOutcome {
    pub effective_count: usize,
    pub fully_succeeded: bool,
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SampleOutcome {
    const fn needs_adjustment(adjusted: usize) -> Self {
        Self {
            effective_count: adjusted,
            fully_succeeded: false,
            extracted: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// 均勻取樣並逐張擷取截圖
pub struct FrameSampler<'a, T: MediaToolkit + ?Sized> {
    toolkit: &'a T,
    policy: SamplingPolicy,
    frame_timeout: Duration,
}

impl<'a, T: MediaToolkit + ?Sized> FrameSampler<'a, T> {
    pub const fn new(toolkit: &'a T, settings: &ExtractorSettings) -> Self {
        Self {
            toolkit,
            policy: SamplingPolicy::from_settings(settings),
            frame_timeout: settings.frame_timeout,
        }
    }

    /// 建立取樣計畫（只做 ffprobe 查詢，不擷取）
    pub fn plan(&self, video_path: &Path, requested: usize) -> Result<SamplingPlan, SamplerError> {
        let probe_error = |e: anyhow::Error| SamplerError::Probe {
            path: video_path.to_path_buf(),
            message: format!("{e:#}"),
        };

        let duration = self.toolkit.duration(video_path).map_err(probe_error)?;
        let fps = parse_frame_rate(&self.toolkit.frame_rate(video_path).map_err(probe_error)?);

        debug!(
            "{}: duration={duration:.3}s fps={fps:.3}",
            video_path.display()
        );

        Ok(SamplingPlan::new(requested, duration, fps, self.policy))
    }

    pub fn sample(
        &self,
        video_path: &Path,
        output_dir: &Path,
        requested: usize,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<SampleOutcome, SamplerError> {
        ensure_directory_exists(output_dir).map_err(|e| SamplerError::OutputDir {
            path: output_dir.to_path_buf(),
            message: format!("{e:#}"),
        })?;

        let plan = self.plan(video_path, requested)?;

        if let Some(adjusted) = plan.adjusted_count() {
            info!(
                "{} 總幀數 {}，截圖數量 {requested} -> {adjusted}",
                video_path.display(),
                plan.total_frames
            );
            on_progress(0.0);
            return Ok(SampleOutcome::needs_adjustment(adjusted));
        }

        let stem = video_stem(video_path);
        let mut outcome = SampleOutcome {
            effective_count: requested,
            fully_succeeded: true,
            extracted: 0,
            skipped: 0,
            failed: 0,
        };

        for (offset, position) in plan.timestamps().into_iter().enumerate() {
            let index = offset + 1;
            let output_path = output_dir.join(frame_file_name(&stem, position));

            let status = self
                .toolkit
                .extract_frame(video_path, position, &output_path, self.frame_timeout)
                .map_err(|e| SamplerError::Extraction {
                    path: video_path.to_path_buf(),
                    index,
                    message: format!("{e:#}"),
                })?;

            match status {
                ExtractionStatus::Extracted => outcome.extracted += 1,
                ExtractionStatus::ExitedWithError(message) => {
                    warn!("截圖 {index} 失敗 ({}): {message}", video_path.display());
                    outcome.failed += 1;
                }
                ExtractionStatus::TimedOut => {
                    warn!("截圖 {index} 逾時，跳過 ({})", video_path.display());
                    outcome.skipped += 1;
                }
            }

            on_progress(index as f64 / requested as f64 * 100.0);
        }

        Ok(outcome)
    }
}
