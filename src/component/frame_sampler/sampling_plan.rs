use crate::config::ExtractorSettings;

/// 截圖數量調整與間隔下限的參數
#[derive(Debug, Clone, Copy)]
pub struct SamplingPolicy {
    pub adjustment_ratio: f64,
    pub min_interval: f64,
}

impl SamplingPolicy {
    #[must_use]
    pub const fn from_settings(settings: &ExtractorSettings) -> Self {
        Self {
            adjustment_ratio: settings.adjustment_ratio,
            min_interval: settings.min_interval,
        }
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::from_settings(&ExtractorSettings::default())
    }
}

/// 一支影片的取樣計畫
#[derive(Debug, Clone)]
pub struct SamplingPlan {
    pub requested_count: usize,
    pub duration: f64,
    pub fps: f64,
    pub total_frames: u64,
    pub effective_count: usize,
    pub interval: f64,
    adjusted: bool,
}

impl SamplingPlan {
    #[must_use]
    pub fn new(requested_count: usize, duration: f64, fps: f64, policy: SamplingPolicy) -> Self {
        let total_frames = estimate_total_frames(duration, fps);

        let ratio_limit = total_frames as f64 * policy.adjustment_ratio;
        let adjusted = total_frames > 0 && requested_count as f64 > ratio_limit;
        let effective_count = if adjusted {
            (ratio_limit.floor() as usize).max(1)
        } else {
            requested_count
        };

        let interval = compute_interval(duration, effective_count, policy.min_interval);

        Self {
            requested_count,
            duration,
            fps,
            total_frames,
            effective_count,
            interval,
            adjusted,
        }
    }

    /// 請求數量超過總幀數比例時，回傳調整後的數量
    #[must_use]
    pub const fn adjusted_count(&self) -> Option<usize> {
        if self.adjusted {
            Some(self.effective_count)
        } else {
            None
        }
    }

    /// `i * interval`，`i = 1..=effective_count`
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        (1..=self.effective_count)
            .map(|i| i as f64 * self.interval)
            .collect()
    }
}

fn estimate_total_frames(duration: f64, fps: f64) -> u64 {
    if fps > 0.0 && duration > 0.0 {
        (duration * fps).floor() as u64
    } else {
        0
    }
}

/// 影片太短時套用間隔下限（可能超出影片長度）
fn compute_interval(duration: f64, count: usize, min_interval: f64) -> f64 {
    let even = duration / (count as f64 + 1.0);
    if duration <= count as f64 * min_interval {
        even.max(min_interval)
    } else {
        even
    }
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
///
/// 無法解析或分母為 0 時回傳 0，總幀數因此為 0，不會觸發數量調整。
#[must_use]
pub fn parse_frame_rate(rate: &str) -> f64 {
    let rate = rate.trim();
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num = num_str.trim().parse::<f64>().ok();
        let den = den_str.trim().parse::<f64>().ok();
        return match (num, den) {
            (Some(num), Some(den)) if den != 0.0 => num / den,
            _ => 0.0,
        };
    }
    rate.parse::<f64>().unwrap_or(0.0)
}
