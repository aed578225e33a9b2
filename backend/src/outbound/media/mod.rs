//! Filesystem image storage rooted at the media directory.
//!
//! All access goes through a capability handle on the media root, so stored
//! paths can never escape it.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageFolder, ImagePath, InlineImage};

/// `ImageStore` writing files beneath a media root directory.
#[derive(Clone)]
pub struct FsImageStore {
    root: Arc<Dir>,
}

impl FsImageStore {
    /// Open (creating if needed) the media root.
    pub fn open(media_root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(media_root, ambient_authority())?;
        let root = Dir::open_ambient_dir(media_root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

fn io_error(error: io::Error) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(
        &self,
        folder: ImageFolder,
        image: &InlineImage,
    ) -> Result<ImagePath, ImageStoreError> {
        let relative = format!(
            "{}/{}.{}",
            folder.as_str(),
            Uuid::new_v4().simple(),
            image.extension()
        );
        let path = ImagePath::new(relative).map_err(|err| ImageStoreError::io(err.to_string()))?;
        let root = Arc::clone(&self.root);
        let bytes = image.bytes().to_vec();
        let target = path.clone();

        tokio::task::spawn_blocking(move || -> io::Result<()> {
            root.create_dir_all(folder.as_str())?;
            root.write(target.as_str(), bytes)
        })
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(io_error)?;

        debug!(path = %path, "stored image");
        Ok(path)
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        let root = Arc::clone(&self.root);
        let target = path.clone();
        tokio::task::spawn_blocking(move || match root.remove_file(target.as_str()) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        })
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(io_error)
    }
}
