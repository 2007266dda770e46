//! Camera seam and the scoped scanner session

use async_trait::async_trait;
use image::GrayImage;

use crate::domain::ClientError;

/// Something that can hand out a live feed (webcam, phone camera, a test
/// double replaying frames).
#[async_trait]
pub trait Camera: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CameraFeed>, ClientError>;
}

#[async_trait]
pub trait CameraFeed: Send {
    /// Next frame, or `None` once the feed has ended
    async fn next_frame(&mut self) -> Result<Option<GrayImage>, ClientError>;

    /// Give the device back. Called exactly once per opened feed.
    fn release(&mut self);
}

/// Owns an open feed for as long as the validator is scanning.
///
/// The feed is released on `close()` or, failing that, on drop, and never
/// twice.
pub struct ScannerSession {
    feed: Option<Box<dyn CameraFeed>>,
}

impl ScannerSession {
    pub async fn open<C: Camera + ?Sized>(camera: &C) -> Result<Self, ClientError> {
        let feed = camera.open().await?;
        tracing::debug!("Camera acquired");
        Ok(Self { feed: Some(feed) })
    }

    pub fn is_open(&self) -> bool {
        self.feed.is_some()
    }

    pub async fn next_frame(&mut self) -> Result<Option<GrayImage>, ClientError> {
        match self.feed.as_mut() {
            Some(feed) => feed.next_frame().await,
            None => Ok(None),
        }
    }

    pub fn close(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.release();
            tracing::debug!("Camera released");
        }
    }
}

impl Drop for ScannerSession {
    fn drop(&mut self) {
        self.close();
    }
}
