//! E2E Integration Tests
//!
//! 透過 JobOrchestrator 執行完整流程：掃描 -> 取樣 -> 擷取

mod common;

use common::{FakeMedia, FakeVideo, jpg_files};
use frame_sampler::component::job_orchestrator::{
    JobEvent, JobHandle, JobOrchestrator, JobRequest, JobState, StartOutcome,
};
use frame_sampler::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn orchestrator(media: FakeMedia) -> JobOrchestrator<FakeMedia> {
    JobOrchestrator::new(Config::new().unwrap(), media)
}

fn request(input: &Path, output: &Path, frame_count: usize) -> JobRequest {
    JobRequest {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        frame_count,
    }
}

fn started(outcome: StartOutcome) -> JobHandle {
    match outcome {
        StartOutcome::Started(handle) => handle,
        StartOutcome::AlreadyRunning => panic!("工作不應該在執行中"),
    }
}

fn run_to_end(handle: JobHandle) -> Vec<JobEvent> {
    let events: Vec<JobEvent> = handle.events().collect();
    handle.join().unwrap();
    events
}

/// 測試 1: 兩支影片各截 4 張，輸出結構鏡像輸入
#[test]
fn test_end_to_end_mirrors_tree() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");

    let media = FakeMedia::new();
    media.add_video(&input.join("vid1.mp4"), 120.0, "24/1");
    media.add_video(&input.join("sub/vid2.avi"), 60.0, "30000/1001");

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 4)).unwrap());
    let events = run_to_end(handle);

    let vid1 = jpg_files(&output.join("vid1"));
    let vid2 = jpg_files(&output.join("sub/vid2"));
    assert_eq!(vid1.len(), 4);
    assert_eq!(vid2.len(), 4);
    assert!(
        vid1.iter()
            .all(|p| p.file_name().unwrap().to_string_lossy().starts_with("vid1_time_"))
    );
    assert!(
        vid2.iter()
            .all(|p| p.file_name().unwrap().to_string_lossy().starts_with("vid2_time_"))
    );

    let summary = events
        .iter()
        .find_map(|e| match e {
            JobEvent::Finished(summary) => Some(*summary),
            _ => None,
        })
        .expect("應該收到完成事件");
    assert_eq!(summary.total_videos, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.frames_extracted, 8);

    assert_eq!(orchestrator.state(), JobState::Idle);
}

/// 測試 2: 進度每支影片從 0 開始並到達 100
#[test]
fn test_progress_events_per_video() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let media = FakeMedia::new();
    media.add_video(&input.join("a.mp4"), 30.0, "25/1");

    let orchestrator = orchestrator(media);
    let handle = started(
        orchestrator
            .start(request(&input, &temp_dir.path().join("out"), 2))
            .unwrap(),
    );
    let progress: Vec<f64> = run_to_end(handle)
        .into_iter()
        .filter_map(|e| match e {
            JobEvent::Progress(p) => Some(p),
            _ => None,
        })
        .collect();

    assert_eq!(progress, vec![0.0, 50.0, 100.0]);
}

/// 測試 3: 影片太短時調整數量並重新擷取一次
#[test]
fn test_short_video_is_adjusted_and_retried() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let media = FakeMedia::new();
    // 1 秒 * 10 fps = 10 幀，80% = 8 張
    media.add_video(&input.join("tiny.mp4"), 1.0, "10/1");

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 20)).unwrap());
    let events = run_to_end(handle);

    assert!(events.iter().any(|e| matches!(
        e,
        JobEvent::Adjusted {
            requested: 20,
            adjusted: 8,
            ..
        }
    )));
    assert_eq!(jpg_files(&output.join("tiny")).len(), 8);

    let summary = events
        .iter()
        .find_map(|e| match e {
            JobEvent::Finished(summary) => Some(*summary),
            _ => None,
        })
        .unwrap();
    assert_eq!(summary.adjusted, 1);
    assert_eq!(summary.succeeded, 1);
}

/// 測試 4: 調整後仍超過上限時只重試一次
#[test]
fn test_adjustment_is_retried_only_once() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let media = FakeMedia::new();
    // 總幀數 1：調整為 1 張，但 1 > 0.8 仍需調整
    media.add_video(&input.join("blip.mp4"), 0.1, "10/1");

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 5)).unwrap());
    let events = run_to_end(handle);

    let adjusted = events
        .iter()
        .filter(|e| matches!(e, JobEvent::Adjusted { .. }))
        .count();
    assert_eq!(adjusted, 1);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, JobEvent::AdjustmentExhausted { count: 1, .. }))
    );
    assert!(jpg_files(&output.join("blip")).is_empty());
    assert!(events.iter().any(|e| matches!(e, JobEvent::Finished(_))));
}

/// 測試 5: 輸入驗證失敗時不會啟動，狀態維持 Idle
#[test]
fn test_validation_errors_keep_idle() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    let orchestrator = orchestrator(FakeMedia::new());

    let missing = orchestrator.start(request(&temp_dir.path().join("nope"), temp_dir.path(), 4));
    assert!(missing.is_err());

    let file_input = temp_dir.path().join("file.txt");
    fs::write(&file_input, "x").unwrap();
    assert!(
        orchestrator
            .start(request(&file_input, temp_dir.path(), 4))
            .is_err()
    );

    assert!(orchestrator.start(request(&input, Path::new(""), 4)).is_err());
    assert!(
        orchestrator
            .start(request(&input, &temp_dir.path().join("out"), 0))
            .is_err()
    );

    assert_eq!(orchestrator.state(), JobState::Idle);
}

/// 測試 6: 執行中再次呼叫 start 會被忽略；結束後可以重新開始
#[test]
fn test_only_one_run_at_a_time() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");

    let (release, gate) = crossbeam_channel::unbounded::<()>();
    let mut media = FakeMedia::new();
    media.gate = Some(gate);
    media.add_video(&input.join("long.mp4"), 100.0, "25/1");

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 3)).unwrap());

    assert!(!orchestrator.state().is_idle());
    assert!(matches!(
        orchestrator.start(request(&input, &output, 3)).unwrap(),
        StartOutcome::AlreadyRunning
    ));

    drop(release);
    let events = run_to_end(handle);
    assert!(events.iter().any(|e| matches!(e, JobEvent::Finished(_))));
    assert_eq!(orchestrator.state(), JobState::Idle);

    // 再次執行到已有截圖的資料夾
    let handle = started(orchestrator.start(request(&input, &output, 3)).unwrap());
    let events = run_to_end(handle);
    assert!(events.iter().any(|e| matches!(e, JobEvent::Finished(_))));
    assert_eq!(jpg_files(&output.join("long")).len(), 3);
}

/// 測試 7: 找不到影片
#[test]
fn test_no_videos_found() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    fs::create_dir_all(input.join("empty/sub")).unwrap();
    fs::write(input.join("readme.txt"), "nothing here").unwrap();

    let orchestrator = orchestrator(FakeMedia::new());
    let handle = started(
        orchestrator
            .start(request(&input, &temp_dir.path().join("out"), 4))
            .unwrap(),
    );
    let events = run_to_end(handle);

    assert!(matches!(events.last(), Some(JobEvent::NoVideosFound)));
    assert_eq!(orchestrator.state(), JobState::Idle);
    // 輸出資料夾在驗證階段就會建立
    assert!(temp_dir.path().join("out").is_dir());
}

/// 測試 8: 單支影片探測失敗只影響該影片
#[test]
fn test_metadata_failure_skips_only_that_video() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let media = FakeMedia::new();
    media.add_video(&input.join("good.mp4"), 40.0, "25/1");
    media.add_video_with(
        &input.join("bad.mp4"),
        FakeVideo {
            duration: None,
            fps: "25/1".to_string(),
        },
    );

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 2)).unwrap());
    let events = run_to_end(handle);

    assert!(events.iter().any(|e| matches!(
        e,
        JobEvent::VideoFailed { name, .. } if name == "bad.mp4"
    )));
    assert_eq!(jpg_files(&output.join("good")).len(), 2);

    let summary = events
        .iter()
        .find_map(|e| match e {
            JobEvent::Finished(summary) => Some(*summary),
            _ => None,
        })
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
}

/// 測試 9: 擷取工具無法啟動時整個工作失敗，並回到 Idle
#[test]
fn test_extraction_launch_failure_fails_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let mut media = FakeMedia::new();
    media.fail_launch = true;
    media.add_video(&input.join("a.mp4"), 40.0, "25/1");
    media.add_video(&input.join("b.mp4"), 40.0, "25/1");

    let orchestrator = orchestrator(media);
    let handle = started(
        orchestrator
            .start(request(&input, &temp_dir.path().join("out"), 2))
            .unwrap(),
    );
    let events = run_to_end(handle);

    assert!(matches!(events.last(), Some(JobEvent::Failed(_))));
    assert!(!events.iter().any(|e| matches!(e, JobEvent::Finished(_))));
    let started_videos = events
        .iter()
        .filter(|e| matches!(e, JobEvent::VideoStarted { .. }))
        .count();
    assert_eq!(started_videos, 1);
    assert_eq!(orchestrator.state(), JobState::Idle);
}

/// 測試 10: ffmpeg 非零結束只算失敗的截圖，影片仍算完成
#[test]
fn test_error_exit_frame_counted_in_summary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let mut media = FakeMedia::new();
    media.error_exit_at = vec![2];
    media.add_video(&input.join("clip.mp4"), 40.0, "25/1");

    let orchestrator = orchestrator(media);
    let handle = started(orchestrator.start(request(&input, &output, 4)).unwrap());
    let events = run_to_end(handle);

    let progress: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            JobEvent::Progress(p) if *p > 0.0 => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![25.0, 50.0, 75.0, 100.0]);
    assert_eq!(jpg_files(&output.join("clip")).len(), 3);

    let summary = events
        .iter()
        .find_map(|e| match e {
            JobEvent::Finished(summary) => Some(*summary),
            _ => None,
        })
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.frames_extracted, 3);
    assert_eq!(summary.frames_failed, 1);
    assert_eq!(summary.frames_skipped, 0);
    assert_eq!(orchestrator.state(), JobState::Idle);
}
