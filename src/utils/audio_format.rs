//! Audio container detection and MIME/extension mapping.
//!
//! Used when a voice sample is loaded from disk (where no declared MIME type
//! exists) and when a synthesized payload is written to a scratch file.

/// MIME type assumed for synthesized speech when the service omits `Content-Type`.
pub const DEFAULT_SPEECH_MIME: &str = "audio/mpeg";

/// Fallback MIME type for content that could not be identified.
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Detect an audio container from its magic bytes.
///
/// Returns `(mime_type, extension)` for recognised containers, `None` otherwise.
pub fn detect_audio_format(data: &[u8]) -> Option<(&'static str, &'static str)> {
    if data.len() < 12 {
        return None;
    }

    if data.starts_with(b"ID3") || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0) {
        return Some(("audio/mpeg", "mp3"));
    }
    if data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some(("audio/wav", "wav"));
    }
    if &data[4..8] == b"ftyp" {
        return Some(if is_audio_only_mp4(data) {
            ("audio/mp4", "m4a")
        } else {
            ("video/mp4", "mp4")
        });
    }
    if data.starts_with(b"OggS") {
        return Some(("audio/ogg", "ogg"));
    }
    if data.starts_with(b"fLaC") {
        return Some(("audio/flac", "flac"));
    }
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(("audio/webm", "webm"));
    }

    None
}

/// ISO-BMFF brands that only carry audio
const AUDIO_MP4_BRANDS: [&[u8; 4]; 5] = [b"M4A ", b"M4B ", b"M4P ", b"F4A ", b"F4B "];

/// Whether an `ftyp` box names an audio-only brand, as major or compatible brand
fn is_audio_only_mp4(data: &[u8]) -> bool {
    let box_len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let end = box_len.clamp(12, data.len());

    // major brand at 8..12, minor version at 12..16, compatible brands after
    let major = data[8..12].chunks_exact(4);
    let compatible = data.get(16..end).unwrap_or_default().chunks_exact(4);
    major
        .chain(compatible)
        .any(|brand| AUDIO_MP4_BRANDS.iter().any(|audio| brand == audio.as_slice()))
}

/// Map a file extension (without the dot, any case) to a MIME type.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" | "wave" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => OCTET_STREAM_MIME,
    }
}

/// Map a MIME type to the file extension used for scratch and download files.
///
/// Parameters such as `; codecs=opus` are ignored.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/opus" => "opus",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/aac" => "aac",
        "audio/webm" => "webm",
        "audio/pcm" | "audio/l16" => "pcm",
        _ => "bin",
    }
}
