use async_trait::async_trait;
use tracing::debug;

use domain::PrinterError;
use domain::driver::ImageLoader;

/// Loads bitmaps from the local filesystem
#[derive(Debug, Default, Clone)]
pub struct FsImageLoader;

impl FsImageLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, path: &str) -> Result<Vec<u8>, PrinterError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PrinterError::ImageLoad {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let format = image::guess_format(&bytes).map_err(|e| PrinterError::ImageLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        debug!(path, format = ?format, size = bytes.len(), "Bitmap loaded");
        Ok(bytes)
    }
}
