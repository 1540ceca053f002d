use crate::component::job_orchestrator::{JobEvent, JobHandle, JobSummary};
use crate::tools::ScanEvent;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_i18n::t;
use std::path::Path;

/// 在主執行緒上顯示背景工作的進度
///
/// 背景工作只送出事件，畫面更新全部在這裡進行。
pub struct ExtractionView {
    progress_bar: ProgressBar,
    max_depth: usize,
}

impl ExtractionView {
    pub fn new(max_depth: usize) -> Result<Self> {
        let progress_bar = ProgressBar::new(100);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Ok(Self {
            progress_bar,
            max_depth,
        })
    }

    /// 消耗事件直到背景工作結束
    pub fn render(&self, handle: &JobHandle) {
        for event in handle.events() {
            self.handle_event(event);
        }
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }

    fn handle_event(&self, event: JobEvent) {
        let bar = &self.progress_bar;
        match event {
            JobEvent::ScanStarted { .. } => bar.set_message(t!("extract.searching").to_string()),
            JobEvent::Scan(scan) => self.handle_scan_event(scan),
            JobEvent::NoVideosFound => {
                bar.finish_and_clear();
                println!("{}", style(t!("extract.no_videos")).yellow());
            }
            JobEvent::VideoStarted { index, total, name } => {
                bar.set_message(
                    t!("extract.processing", index = index, total = total, name = name)
                        .to_string(),
                );
            }
            JobEvent::Progress(percent) => bar.set_position(percent.clamp(0.0, 100.0).round() as u64),
            JobEvent::Adjusted {
                name,
                requested,
                adjusted,
            } => {
                let notice = t!(
                    "extract.adjusted",
                    name = name,
                    requested = requested,
                    adjusted = adjusted
                );
                bar.println(format!("{}", style(notice).yellow()));
            }
            JobEvent::AdjustmentExhausted { name, count } => {
                let notice = t!("extract.adjustment_exhausted", name = name, count = count);
                bar.println(format!("{}", style(notice).yellow()));
            }
            JobEvent::VideoFinished { name, outcome } => {
                let line = t!(
                    "extract.video_done",
                    name = name,
                    extracted = outcome.extracted,
                    skipped = outcome.skipped,
                    failed = outcome.failed
                );
                bar.println(format!("  {} {}", style("✓").green(), line));
            }
            JobEvent::VideoFailed { name, message } => {
                let line = t!("extract.video_failed", name = name, error = message);
                bar.println(format!("  {} {}", style("✗").red(), line));
            }
            JobEvent::Finished(summary) => {
                bar.finish_and_clear();
                println!("{}", style(t!("extract.done")).green().bold());
                print_summary(&summary);
            }
            JobEvent::Failed(message) => {
                bar.abandon();
                eprintln!(
                    "{} {}",
                    style(t!("common.error_prefix")).red().bold(),
                    t!("extract.run_failed", error = message)
                );
            }
        }
    }

    fn handle_scan_event(&self, event: ScanEvent) {
        let bar = &self.progress_bar;
        match event {
            ScanEvent::EnteringDirectory { path, depth } => bar.set_message(
                t!(
                    "extract.searching_dir",
                    path = path.display(),
                    depth = depth,
                    max = self.max_depth
                )
                .to_string(),
            ),
            ScanEvent::DepthLimitReached { path, max_depth } => {
                let notice = t!("extract.depth_limit", max = max_depth, path = path.display());
                bar.println(format!("{}", style(notice).dim()));
            }
            ScanEvent::VideoFound { path } => {
                bar.set_message(t!("extract.found_video", name = file_name(&path)).to_string());
            }
            ScanEvent::EntryError { path, message } => {
                let shown = path.as_deref().map_or_else(String::new, |p| p.display().to_string());
                let notice = t!("extract.access_error", path = shown, error = message);
                bar.println(format!("{}", style(notice).red()));
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}

fn print_summary(summary: &JobSummary) {
    println!();
    println!("{}", style(t!("extract.summary_title")).cyan().bold());
    println!("  {}", t!("extract.summary_total", count = summary.total_videos));
    println!(
        "  {}",
        style(t!("extract.summary_succeeded", count = summary.succeeded)).green()
    );
    if summary.failed > 0 {
        println!(
            "  {}",
            style(t!("extract.summary_failed", count = summary.failed)).red()
        );
    }
    if summary.adjusted > 0 {
        println!(
            "  {}",
            style(t!("extract.summary_adjusted", count = summary.adjusted)).yellow()
        );
    }
    println!("  {}", t!("extract.summary_frames", count = summary.frames_extracted));
    if summary.frames_skipped > 0 {
        println!("  {}", t!("extract.summary_skipped", count = summary.frames_skipped));
    }
}
