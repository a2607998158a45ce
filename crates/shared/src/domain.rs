/// Largest payload the upload endpoint accepts: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

pub const BYTES_PER_MIB: u64 = 1024 * 1024;

pub const UPLOAD_PATH: &str = "/api/upload-audio";
pub const HEALTH_PATH: &str = "/api/health";

/// Name of the multipart field carrying the audio payload.
pub const UPLOAD_FIELD: &str = "file";

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "audio/mp3",
    "audio/wav",
    "audio/mpeg",
    "audio/m4a",
    "audio/ogg",
];

/// Lowercase, without the leading dot.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];

pub fn is_accepted_mime_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

/// Case-insensitive match on the final `.ext` of `filename`.
pub fn has_accepted_extension(filename: &str) -> bool {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str())
}
