use std::path::{Path, PathBuf};

use crate::error::AppError;

/// The single text file shared by the save, load and open-editor endpoints.
///
/// Last writer wins; there is no locking.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    path: PathBuf,
}

impl TextBuffer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, text: &str) -> Result<(), AppError> {
        tokio::fs::write(&self.path, text)
            .await
            .map_err(AppError::SaveText)?;
        tracing::debug!("Saved {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    /// Read errors, including a missing file, yield an empty string.
    pub async fn load(&self) -> String {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("No text loaded from {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_before_save_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = TextBuffer::new(dir.path().join("text.txt"));
        assert_eq!(buffer.load().await, "");
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = TextBuffer::new(dir.path().join("text.txt"));
        buffer.save("你好, world\nline two").await.unwrap();
        assert_eq!(buffer.load().await, "你好, world\nline two");
    }

    #[tokio::test]
    async fn save_overwrites_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = TextBuffer::new(dir.path().join("text.txt"));
        buffer.save("a much longer first draft").await.unwrap();
        buffer.save("short").await.unwrap();
        assert_eq!(buffer.load().await, "short");
    }

    #[tokio::test]
    async fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = TextBuffer::new(dir.path().join("missing").join("text.txt"));
        let err = buffer.save("hello").await.unwrap_err();
        assert!(matches!(err, AppError::SaveText(_)));
    }
}
