//! JSON dump source for offline replay

use super::{decode_messages, MessageSource, RawMessage};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MessageSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<Vec<RawMessage>> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        let messages = decode_messages(&payload)?;
        tracing::debug!("Loaded {} messages from {}", messages.len(), self.path.display());
        Ok(messages)
    }
}
