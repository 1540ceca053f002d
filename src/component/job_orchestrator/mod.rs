//! 批次截圖工作協調
//!
//! 狀態流程：Idle -> Scanning -> Processing(i) -> ... -> Done | Failed -> Idle
//! 所有工作都在單一背景執行緒中依序執行，進度與狀態透過事件通道回報。

mod job_state;
mod main;

pub use job_state::{JobEvent, JobRequest, JobState, JobSummary};
pub use main::{JobHandle, JobOrchestrator, StartOutcome};
