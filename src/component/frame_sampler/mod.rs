//! 影片均勻截圖元件
//!
//! 1. 取得影片長度與幀率（ffprobe）
//! 2. 依總幀數決定是否需要調整截圖數量
//! 3. 計算時間點並逐張擷取（ffmpeg，單張有逾時限制）

mod frame_naming;
mod main;
mod sampling_plan;

pub use frame_naming::{frame_file_name, video_stem};
pub use main::{FrameSampler, SampleOutcome, SamplerError};
pub use sampling_plan::{SamplingPlan, SamplingPolicy, parse_frame_rate};
