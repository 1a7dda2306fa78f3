use super::Interceptor;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Writes each exchange as a markdown file under `base_path`.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
    sequence: AtomicUsize,
}

impl FileInterceptor {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            sequence: AtomicUsize::new(0),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(
        &self,
        prompt: &str,
        response: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let timestamp = Utc::now();
        // Several attempts can land in the same millisecond.
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let filename = format!("attempt_{}_{:03}.md", timestamp.format("%Y%m%d_%H%M%S_%3f"), seq);
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let content = format!("# Prompt\n\n{}\n\n# Response\n\n{}\n", prompt, response);

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
