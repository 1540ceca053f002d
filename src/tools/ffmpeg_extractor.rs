use super::ffprobe_prober::FfprobeProber;
use super::media::{ExtractionStatus, FrameExtractor, MediaProber};
use crate::config::ExtractorSettings;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 以 ffmpeg 子程序實作的 [`FrameExtractor`]
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    binary: String,
    quality: u8,
}

impl FfmpegExtractor {
    #[must_use]
    pub fn new(binary: impl Into<String>, quality: u8) -> Self {
        Self {
            binary: binary.into(),
            quality,
        }
    }

    fn build_command(&self, video: &Path, position: f64, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .arg("-ss")
            .arg(format!("{position:.3}"))
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1", "-q:v"])
            .arg(self.quality.to_string())
            .arg("-y")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl FrameExtractor for FfmpegExtractor {
    fn extract_frame(
        &self,
        video: &Path,
        position: f64,
        output: &Path,
        timeout: Duration,
    ) -> Result<ExtractionStatus> {
        debug!("擷取截圖: {} @ {position:.3}s -> {}", video.display(), output.display());

        let mut child = self
            .build_command(video, position, output)
            .spawn()
            .with_context(|| format!("無法執行 ffmpeg 擷取截圖: {}", video.display()))?;

        wait_with_timeout(&mut child, timeout)
    }
}

/// 保留在錯誤訊息中的 stderr 尾端長度
const STDERR_TAIL: usize = 2048;

/// 在背景執行緒持續讀取 stderr，避免管線寫滿時子程序卡住
fn drain_stderr(child: &mut Child) -> Option<thread::JoinHandle<String>> {
    let mut pipe = child.stderr.take()?;
    Some(thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buffer) {
            debug!("讀取 ffmpeg stderr 失敗: {e}");
        }
        let start = buffer.len().saturating_sub(STDERR_TAIL);
        String::from_utf8_lossy(&buffer[start..]).trim().to_string()
    }))
}

fn collect_stderr(reader: Option<thread::JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// 輪詢子程序直到結束或逾時；逾時會終止並回收子程序
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExtractionStatus> {
    let started = Instant::now();
    let reader = drain_stderr(child);

    loop {
        if let Some(status) = child.try_wait().context("無法檢查 ffmpeg 程序狀態")? {
            let stderr = collect_stderr(reader);
            if status.success() {
                return Ok(ExtractionStatus::Extracted);
            }
            let message = if stderr.is_empty() {
                format!("ffmpeg 結束碼: {status}")
            } else {
                stderr
            };
            return Ok(ExtractionStatus::ExitedWithError(message));
        }

        if started.elapsed() >= timeout {
            if let Err(e) = child.kill() {
                warn!("無法終止逾時的 ffmpeg 程序: {e}");
            }
            if let Err(e) = child.wait() {
                warn!("無法回收逾時的 ffmpeg 程序: {e}");
            }
            collect_stderr(reader);
            return Ok(ExtractionStatus::TimedOut);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// ffprobe + ffmpeg 組合，供擷取流程整體使用
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    prober: FfprobeProber,
    extractor: FfmpegExtractor,
}

impl FfmpegToolkit {
    #[must_use]
    pub fn new(settings: &ExtractorSettings) -> Self {
        Self {
            prober: FfprobeProber::new(settings.ffprobe_binary.clone()),
            extractor: FfmpegExtractor::new(settings.ffmpeg_binary.clone(), settings.jpeg_quality),
        }
    }
}

impl MediaProber for FfmpegToolkit {
    fn format_name(&self, path: &Path) -> Result<String> {
        self.prober.format_name(path)
    }

    fn duration(&self, path: &Path) -> Result<f64> {
        self.prober.duration(path)
    }

    fn frame_rate(&self, path: &Path) -> Result<String> {
        self.prober.frame_rate(path)
    }
}

impl FrameExtractor for FfmpegToolkit {
    fn extract_frame(
        &self,
        video: &Path,
        position: f64,
        output: &Path,
        timeout: Duration,
    ) -> Result<ExtractionStatus> {
        self.extractor.extract_frame(video, position, output, timeout)
    }
}

/// 確認 ffprobe 與 ffmpeg 都能執行
pub fn check_tools_available(settings: &ExtractorSettings) -> Result<()> {
    for binary in [&settings.ffprobe_binary, &settings.ffmpeg_binary] {
        let output = Command::new(binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("找不到 {binary}，請先安裝 FFmpeg"))?;
        if !output.status.success() {
            bail!("{binary} -version 執行失敗");
        }
    }
    Ok(())
}
