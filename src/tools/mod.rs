mod ffmpeg_extractor;
mod ffprobe_prober;
mod media;
mod path_validator;
mod video_identifier;
mod video_scanner;

pub use ffmpeg_extractor::{FfmpegExtractor, FfmpegToolkit, check_tools_available};
pub use ffprobe_prober::FfprobeProber;
pub use media::{ExtractionStatus, FrameExtractor, MediaProber, MediaToolkit};
pub use path_validator::{
    ensure_directory_exists, suggest_output_directory, validate_directory_exists,
};
pub use video_identifier::is_video_file;
pub use video_scanner::{ScanEvent, VideoTask, scan_video_tasks};
