use crate::component::frame_sampler::SampleOutcome;
use crate::tools::ScanEvent;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Scanning,
    Processing {
        index: usize,
        total: usize,
    },
    Done,
    Failed,
}

impl JobState {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub frame_count: usize,
}

/// 背景工作送往介面層的事件
#[derive(Debug, Clone)]
pub enum JobEvent {
    ScanStarted {
        root: PathBuf,
    },
    Scan(ScanEvent),
    NoVideosFound,
    VideoStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// 單支影片進度（0-100）
    Progress(f64),
    Adjusted {
        name: String,
        requested: usize,
        adjusted: usize,
    },
    /// 調整後的數量仍超過上限；只重試一次，不再調整
    AdjustmentExhausted {
        name: String,
        count: usize,
    },
    VideoFinished {
        name: String,
        outcome: SampleOutcome,
    },
    VideoFailed {
        name: String,
        message: String,
    },
    Finished(JobSummary),
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    pub total_videos: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub adjusted: usize,
    pub frames_extracted: usize,
    pub frames_skipped: usize,
    pub frames_failed: usize,
}

impl JobSummary {
    pub(super) fn record(&mut self, outcome: &SampleOutcome) {
        self.succeeded += 1;
        self.frames_extracted += outcome.extracted;
        self.frames_skipped += outcome.skipped;
        self.frames_failed += outcome.failed;
    }
}
