//! Image references and inline image payloads.
//!
//! Clients send images either as a reference to a file the server stored
//! earlier (`recipes/3f2c….png`) or inline as
//! `data:image/<ext>;base64,<payload>`. Inline payloads are decoded here and
//! handed to an [`ImageStore`](crate::domain::ports::ImageStore), which turns
//! them into an [`ImagePath`].

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const DATA_URI_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Validation errors raised while interpreting image input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageInputError {
    /// The value was empty.
    #[error("image must not be empty")]
    Empty,
    /// A `data:` URI without the `;base64,` marker.
    #[error("image data must be base64 encoded")]
    NotBase64,
    /// The declared image type is not accepted.
    #[error("unsupported image type {0:?}")]
    UnsupportedType(String),
    /// The payload is not valid base64.
    #[error("image payload could not be decoded")]
    Undecodable,
    /// A stored reference that is not a safe relative path.
    #[error("invalid image reference {0:?}")]
    InvalidReference(String),
}

/// Folder under the media root an image is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    /// Recipe photos.
    Recipes,
    /// User avatars.
    Avatars,
}

impl ImageFolder {
    /// Directory name relative to the media root.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recipes => "recipes",
            Self::Avatars => "users",
        }
    }
}

/// Relative path of a stored image, e.g. `recipes/9b1d.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

impl ImagePath {
    /// Validate a relative path made of plain file-name segments.
    pub fn new(value: impl Into<String>) -> Result<Self, ImageInputError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .chars()
                        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
            });
        if valid {
            Ok(Self(value))
        } else {
            Err(ImageInputError::InvalidReference(value))
        }
    }

    /// Borrow the relative path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ImagePath {
    type Error = ImageInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

/// Decoded inline image awaiting storage.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    extension: String,
    bytes: Vec<u8>,
}

impl InlineImage {
    /// Normalised file extension (`jpeg` becomes `jpg`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Decoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Image supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Previously stored image.
    Stored(ImagePath),
    /// Inline payload to decode and store.
    Inline(InlineImage),
}

impl ImageInput {
    /// Interpret raw client input.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::ImageInput;
    ///
    /// let inline = ImageInput::parse("data:image/png;base64,iVBORw0KGgo=").expect("inline");
    /// assert!(matches!(inline, ImageInput::Inline(_)));
    ///
    /// let stored = ImageInput::parse("recipes/soup.png").expect("stored");
    /// assert!(matches!(stored, ImageInput::Stored(_)));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ImageInputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ImageInputError::Empty);
        }
        match raw.strip_prefix(DATA_URI_PREFIX) {
            Some(rest) => decode_inline(rest).map(Self::Inline),
            None => ImagePath::new(raw).map(Self::Stored),
        }
    }
}

fn decode_inline(rest: &str) -> Result<InlineImage, ImageInputError> {
    let (kind, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or(ImageInputError::NotBase64)?;
    let kind = kind.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&kind.as_str()) {
        return Err(ImageInputError::UnsupportedType(kind));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageInputError::Undecodable)?;
    if bytes.is_empty() {
        return Err(ImageInputError::Empty);
    }
    let extension = if kind == "jpeg" { "jpg".to_owned() } else { kind };
    Ok(InlineImage { extension, bytes })
}
