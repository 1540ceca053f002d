use std::path::Path;

/// `<stem>_time_<MM>m<SS>s<NNN>ms.jpg`
#[must_use]
pub fn frame_file_name(stem: &str, position: f64) -> String {
    let position = position.max(0.0);
    let minutes = (position / 60.0).floor() as u64;
    let seconds = (position % 60.0).floor() as u64;
    let milliseconds = ((position % 1.0) * 1000.0).floor() as u64;
    format!("{stem}_time_{minutes:02}m{seconds:02}s{milliseconds:03}ms.jpg")
}

#[must_use]
pub fn video_stem(video_path: &Path) -> String {
    video_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string())
}
