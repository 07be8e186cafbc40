//! MIME 类型常量.

/// VP9 视频
pub const VIDEO_VP9: &str = "video/x-vnd.on2.vp9";
/// H.264 / AVC 视频
pub const VIDEO_H264: &str = "video/avc";
/// 未压缩视频帧 (软件直通解码器使用)
pub const VIDEO_RAW: &str = "video/raw";

/// 是否为视频 MIME
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video")
}
