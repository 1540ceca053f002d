use super::media::MediaProber;
use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Default, Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    #[serde(default)]
    streams: Vec<StreamInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamInfo {
    r_frame_rate: Option<String>,
}

/// 以 ffprobe 子程序實作的 [`MediaProber`]
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: String,
}

impl FfprobeProber {
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn query(&self, path: &Path, selection: &[&str]) -> Result<FfprobeOutput> {
        let output = Command::new(&self.binary)
            .args(["-v", "error"])
            .args(selection)
            .args(["-of", "json"])
            .arg(path)
            .output()
            .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe 執行失敗: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("ffprobe {}: {}", path.display(), stdout.trim());
        parse_probe_output(&stdout)
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

fn parse_probe_output(raw: &str) -> Result<FfprobeOutput> {
    if raw.trim().is_empty() {
        return Ok(FfprobeOutput::default());
    }
    serde_json::from_str(raw).context("無法解析 ffprobe 輸出")
}

impl MediaProber for FfprobeProber {
    fn format_name(&self, path: &Path) -> Result<String> {
        let probe = self.query(path, &["-show_entries", "format=format_name"])?;
        Ok(probe
            .format
            .and_then(|f| f.format_name)
            .map(|name| name.trim().to_string())
            .unwrap_or_default())
    }

    fn duration(&self, path: &Path) -> Result<f64> {
        let probe = self.query(path, &["-show_entries", "format=duration"])?;
        let raw = probe
            .format
            .and_then(|f| f.duration)
            .ok_or_else(|| anyhow::anyhow!("無法取得影片長度: {}", path.display()))?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("影片長度格式錯誤: {raw}"))
    }

    fn frame_rate(&self, path: &Path) -> Result<String> {
        let probe = self.query(
            path,
            &["-select_streams", "v", "-show_entries", "stream=r_frame_rate"],
        )?;
        Ok(probe
            .streams
            .into_iter()
            .find_map(|s| s.r_frame_rate)
            .unwrap_or_default())
    }
}
