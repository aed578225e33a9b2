//! Port for persisting decoded images under the media root.

use async_trait::async_trait;

use crate::domain::{ImageFolder, ImagePath, InlineImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the media directory failed.
        Io => "image store failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write the payload under `folder` with a fresh file name.
    async fn store(
        &self,
        folder: ImageFolder,
        image: &InlineImage,
    ) -> Result<ImagePath, ImageStoreError>;

    /// Remove a stored image. Missing files are not an error.
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError>;
}
