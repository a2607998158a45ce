use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use shared::domain::{has_accepted_extension, is_accepted_mime_type, MAX_UPLOAD_BYTES};

use crate::error::{TransportError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A user-chosen audio file, held until the next submit or reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    size_bytes: u64,
    mime_type: String,
    contents: FileContents,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
        contents: FileContents,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            contents,
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let size_bytes = bytes.len() as u64;
        Self::new(name, size_bytes, mime_type, FileContents::Bytes(bytes))
    }

    /// Stats `path` and guesses the declared type from its extension.
    /// The guess is empty when the extension is unknown.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("failed to read metadata for '{}'", path.display()))?;
        if !metadata.is_file() {
            bail!("'{}' is not a regular file", path.display());
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("'{}' has no file name", path.display()))?;
        let mime_type = mime_guess::from_path(path).first_raw().unwrap_or_default();

        Ok(Self::new(
            name,
            metadata.len(),
            mime_type,
            FileContents::Path(path.to_path_buf()),
        ))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn contents(&self) -> &FileContents {
        &self.contents
    }

    pub async fn read_contents(&self) -> Result<Vec<u8>, TransportError> {
        match &self.contents {
            FileContents::Bytes(bytes) => Ok(bytes.clone()),
            FileContents::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|err| TransportError::ReadFile {
                        path: path.display().to_string(),
                        reason: err.to_string(),
                    })
            }
        }
    }
}

/// Client-side checks run before any request is issued.
///
/// The type check passes when either the declared MIME type or the filename
/// extension is recognized.
pub fn validate_selection(file: Option<&SelectedFile>) -> Result<&SelectedFile, ValidationError> {
    let Some(file) = file else {
        return Err(ValidationError::NoFileSelected);
    };

    if file.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size_bytes: file.size_bytes,
        });
    }

    if !is_accepted_mime_type(&file.mime_type) && !has_accepted_extension(&file.name) {
        return Err(ValidationError::UnsupportedType {
            filename: file.name.clone(),
            mime_type: file.mime_type.clone(),
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(name: &str, size_bytes: u64, mime_type: &str) -> SelectedFile {
        SelectedFile::new(
            name,
            size_bytes,
            mime_type,
            FileContents::Path(PathBuf::from(name)),
        )
    }

    #[test]
    fn missing_selection_is_rejected() {
        assert_eq!(
            validate_selection(None).unwrap_err(),
            ValidationError::NoFileSelected
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = declared("take.mp3", MAX_UPLOAD_BYTES, "audio/mpeg");
        assert!(validate_selection(Some(&at_limit)).is_ok());

        let over = declared("take.mp3", MAX_UPLOAD_BYTES + 1, "audio/mpeg");
        assert_eq!(
            validate_selection(Some(&over)).unwrap_err(),
            ValidationError::FileTooLarge {
                size_bytes: 52_428_801
            }
        );
    }

    #[test]
    fn size_is_checked_before_type() {
        let file = declared("notes.txt", MAX_UPLOAD_BYTES * 2, "text/plain");
        assert!(matches!(
            validate_selection(Some(&file)),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn recognized_extension_passes_regardless_of_mime() {
        for name in ["a.mp3", "B.WAV", "c.M4a", "d.ogg"] {
            for mime in ["", "application/octet-stream", "video/mp4"] {
                let file = declared(name, 10, mime);
                assert!(
                    validate_selection(Some(&file)).is_ok(),
                    "{name} with '{mime}' should pass"
                );
            }
        }
    }

    #[test]
    fn recognized_mime_passes_with_unknown_extension() {
        let file = declared("track.unknownext", 10, "audio/mpeg");
        assert!(validate_selection(Some(&file)).is_ok());
    }

    #[test]
    fn unrecognized_mime_and_extension_is_rejected() {
        let file = declared("notes.txt", 10, "text/plain");
        assert_eq!(
            validate_selection(Some(&file)).unwrap_err(),
            ValidationError::UnsupportedType {
                filename: "notes.txt".into(),
                mime_type: "text/plain".into(),
            }
        );
    }

    #[test]
    fn from_path_guesses_type_and_size() {
        let dir = std::env::temp_dir()
            .join(format!("upload_client_selection_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("warmup.mp3");
        std::fs::write(&path, b"ID3-not-really").expect("write");

        let file = SelectedFile::from_path(&path).expect("select");
        assert_eq!(file.name(), "warmup.mp3");
        assert_eq!(file.size_bytes(), 14);
        assert_eq!(file.mime_type(), "audio/mpeg");
        assert_eq!(file.contents(), &FileContents::Path(path.clone()));

        assert!(SelectedFile::from_path(&dir).is_err());
        std::fs::remove_dir_all(dir).expect("cleanup");
    }

    #[tokio::test]
    async fn reading_missing_path_reports_the_path() {
        let file = declared("/definitely/not/here.wav", 1, "audio/wav");
        let err = file.read_contents().await.unwrap_err();
        assert!(
            err.to_string().contains("/definitely/not/here.wav"),
            "unexpected error: {err}"
        );
    }
}
