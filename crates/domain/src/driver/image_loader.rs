use async_trait::async_trait;

use crate::error::PrinterError;

/// Reads bitmap bytes referenced by a print instruction
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fails with `PrinterError::ImageLoad` when the path cannot be read
    async fn load(&self, path: &str) -> Result<Vec<u8>, PrinterError>;
}
