pub mod ffmpeg;
pub mod recorder;
pub mod still;
