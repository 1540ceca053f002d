use super::job_state::{JobEvent, JobRequest, JobState, JobSummary};
use crate::component::frame_sampler::{FrameSampler, SampleOutcome, SamplerError, video_stem};
use crate::config::Config;
use crate::tools::{
    FfmpegToolkit, MediaToolkit, ensure_directory_exists, scan_video_tasks,
    validate_directory_exists,
};
use anyhow::{Context, Result, anyhow, bail};
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

pub enum StartOutcome {
    Started(JobHandle),
    /// 已有工作在執行，本次呼叫被忽略
    AlreadyRunning,
}

/// 一次執行中的工作；事件串流在背景執行緒結束時關閉
pub struct JobHandle {
    events: Receiver<JobEvent>,
    worker: JoinHandle<()>,
}

impl JobHandle {
    /// 阻塞式迭代事件，直到背景工作結束
    pub fn events(&self) -> crossbeam_channel::Iter<'_, JobEvent> {
        self.events.iter()
    }

    pub fn join(self) -> Result<()> {
        self.worker
            .join()
            .map_err(|_| anyhow!("背景工作執行緒異常結束"))
    }
}

/// 批次截圖的工作協調者
///
/// 同時間只允許一個工作：狀態在 `start` 中檢查並設定後才啟動背景執行緒。
pub struct JobOrchestrator<T: MediaToolkit + 'static> {
    config: Config,
    toolkit: Arc<T>,
    state: Arc<Mutex<JobState>>,
}

impl JobOrchestrator<FfmpegToolkit> {
    #[must_use]
    pub fn with_ffmpeg(config: Config) -> Self {
        let toolkit = FfmpegToolkit::new(&config.settings);
        Self::new(config, toolkit)
    }
}

impl<T: MediaToolkit + 'static> JobOrchestrator<T> {
    pub fn new(config: Config, toolkit: T) -> Self {
        Self {
            config,
            toolkit: Arc::new(toolkit),
            state: Arc::new(Mutex::new(JobState::Idle)),
        }
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, request: JobRequest) -> Result<StartOutcome> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.is_idle() {
            debug!("工作進行中（{:?}），忽略新的請求", *state);
            return Ok(StartOutcome::AlreadyRunning);
        }

        validate_request(&request)?;
        *state = JobState::Scanning;
        drop(state);

        let (sender, receiver) = unbounded();
        let toolkit = Arc::clone(&self.toolkit);
        let config = self.config.clone();
        let shared_state = Arc::clone(&self.state);

        let spawned = thread::Builder::new()
            .name("frame-sampler-worker".to_string())
            .spawn(move || {
                let _guard = IdleGuard {
                    state: Arc::clone(&shared_state),
                    events: sender.clone(),
                };
                let worker = Worker {
                    toolkit: toolkit.as_ref(),
                    config: &config,
                    state: &shared_state,
                    events: &sender,
                };
                worker.run(&request);
            });

        match spawned {
            Ok(worker) => Ok(StartOutcome::Started(JobHandle {
                events: receiver,
                worker,
            })),
            Err(e) => {
                self.set_state(JobState::Idle);
                Err(e).context("無法啟動背景工作執行緒")
            }
        }
    }

    fn set_state(&self, next: JobState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

fn validate_request(request: &JobRequest) -> Result<()> {
    if request.input_dir.as_os_str().is_empty() {
        bail!("請選擇有效的輸入資料夾");
    }
    validate_directory_exists(&request.input_dir)?;

    if request.output_dir.as_os_str().is_empty() {
        bail!("請選擇有效的輸出資料夾");
    }
    if request.frame_count == 0 {
        bail!("截圖數量必須大於 0");
    }

    ensure_directory_exists(&request.output_dir)
}

/// 背景工作結束（含 panic）時把狀態還原為 Idle
struct IdleGuard {
    state: Arc<Mutex<JobState>>,
    events: Sender<JobEvent>,
}

impl Drop for IdleGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("背景工作執行緒發生 panic");
            let _ = self
                .events
                .send(JobEvent::Failed("背景工作執行緒異常結束".to_string()));
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = JobState::Idle;
    }
}

enum VideoResult {
    Sampled(SampleOutcome),
    SampledAfterAdjustment(SampleOutcome),
    AdjustmentExhausted,
}

struct Worker<'a, T: MediaToolkit + ?Sized> {
    toolkit: &'a T,
    config: &'a Config,
    state: &'a Mutex<JobState>,
    events: &'a Sender<JobEvent>,
}

impl<T: MediaToolkit + ?Sized> Worker<'_, T> {
    fn emit(&self, event: JobEvent) {
        if self.events.send(event).is_err() {
            debug!("介面層已關閉事件串流");
        }
    }

    fn set_state(&self, next: JobState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn run(&self, request: &JobRequest) {
        match self.process(request) {
            Ok(Some(summary)) => {
                info!(
                    "處理完成 - 成功: {}, 失敗: {}, 調整: {}",
                    summary.succeeded, summary.failed, summary.adjusted
                );
                self.set_state(JobState::Done);
                self.emit(JobEvent::Finished(summary));
            }
            Ok(None) => {
                self.set_state(JobState::Done);
                self.emit(JobEvent::NoVideosFound);
            }
            Err(e) => {
                error!("處理出錯: {e:#}");
                self.set_state(JobState::Failed);
                self.emit(JobEvent::Failed(format!("{e:#}")));
            }
        }
    }

    fn process(&self, request: &JobRequest) -> Result<Option<JobSummary>> {
        self.set_state(JobState::Scanning);
        self.emit(JobEvent::ScanStarted {
            root: request.input_dir.clone(),
        });

        let tasks = scan_video_tasks(
            &request.input_dir,
            &request.input_dir,
            &request.output_dir,
            self.config.settings.max_depth,
            &self.config.file_type_table,
            self.toolkit,
            &mut |event| self.emit(JobEvent::Scan(event)),
        );

        if tasks.is_empty() {
            info!("未找到影片檔案: {}", request.input_dir.display());
            return Ok(None);
        }

        let total = tasks.len();
        info!("找到 {total} 個影片檔案");

        let mut summary = JobSummary {
            total_videos: total,
            ..JobSummary::default()
        };

        for (offset, task) in tasks.iter().enumerate() {
            let index = offset + 1;
            let name = task
                .source_path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().to_string());

            self.set_state(JobState::Processing { index, total });
            self.emit(JobEvent::VideoStarted {
                index,
                total,
                name: name.clone(),
            });

            let video_output_dir = task.output_dir.join(video_stem(&task.source_path));
            self.emit(JobEvent::Progress(0.0));

            match self.process_video(&task.source_path, &video_output_dir, &name, request.frame_count) {
                Ok(VideoResult::Sampled(outcome)) => {
                    summary.record(&outcome);
                    self.emit(JobEvent::VideoFinished { name, outcome });
                }
                Ok(VideoResult::SampledAfterAdjustment(outcome)) => {
                    summary.adjusted += 1;
                    summary.record(&outcome);
                    self.emit(JobEvent::VideoFinished { name, outcome });
                }
                Ok(VideoResult::AdjustmentExhausted) => {
                    summary.adjusted += 1;
                    summary.failed += 1;
                }
                Err(e) if e.is_per_video() => {
                    warn!("{e}");
                    summary.failed += 1;
                    self.emit(JobEvent::VideoFailed {
                        name,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Some(summary))
    }

    /// 取樣一次；若需要調整數量則以調整後的數量再取樣一次（最多重試一次）
    fn process_video(
        &self,
        video_path: &Path,
        output_dir: &Path,
        name: &str,
        requested: usize,
    ) -> Result<VideoResult, SamplerError> {
        let sampler = FrameSampler::new(self.toolkit, &self.config.settings);
        let mut on_progress = |percent: f64| self.emit(JobEvent::Progress(percent));

        let first = sampler.sample(video_path, output_dir, requested, &mut on_progress)?;
        if first.fully_succeeded {
            return Ok(VideoResult::Sampled(first));
        }

        let adjusted = first.effective_count;
        info!("影片 {name} 太短，截圖數量調整為 {adjusted}");
        self.emit(JobEvent::Adjusted {
            name: name.to_string(),
            requested,
            adjusted,
        });

        let retry = sampler.sample(video_path, output_dir, adjusted, &mut on_progress)?;
        if retry.fully_succeeded {
            Ok(VideoResult::SampledAfterAdjustment(retry))
        } else {
            warn!(
                "影片 {name} 調整後仍超過上限（{adjusted} -> {}），不再重試",
                retry.effective_count
            );
            self.emit(JobEvent::AdjustmentExhausted {
                name: name.to_string(),
                count: adjusted,
            });
            Ok(VideoResult::AdjustmentExhausted)
        }
    }
}
