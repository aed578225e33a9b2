//! Short redirect links.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ports::ShortHashGenerator;

/// Maximum stored URL length.
pub const URL_MAX: usize = 2048;
/// Maximum stored hash length (`short_links.url_hash` column width).
pub const HASH_MAX: usize = 16;

/// Validation errors for short-link values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortLinkValidationError {
    #[error("url must be an absolute http(s) URL of at most {URL_MAX} characters")]
    InvalidUrl,
    #[error("hash must be a non-empty alphanumeric string of at most {HASH_MAX} characters")]
    InvalidHash,
    #[error("hash length range {min}..={max} is invalid (allowed 1..={HASH_MAX})")]
    InvalidLengthRange { min: usize, max: usize },
}

/// Absolute http(s) URL a short link redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OriginalUrl(String);

impl OriginalUrl {
    /// Validate an absolute http(s) URL.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ShortLinkValidationError> {
        let value = value.as_ref().trim();
        if value.len() > URL_MAX {
            return Err(ShortLinkValidationError::InvalidUrl);
        }
        let parsed = Url::parse(value).map_err(|_| ShortLinkValidationError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(ShortLinkValidationError::InvalidUrl);
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OriginalUrl {
    type Error = ShortLinkValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OriginalUrl> for String {
    fn from(value: OriginalUrl) -> Self {
        value.0
    }
}

impl fmt::Display for OriginalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque alphanumeric key of a short link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortHash(String);

impl ShortHash {
    /// Validate a hash.
    pub fn new(value: impl Into<String>) -> Result<Self, ShortLinkValidationError> {
        let value = value.into();
        if value.is_empty()
            || value.len() > HASH_MAX
            || !value.chars().all(|ch| ch.is_ascii_alphanumeric())
        {
            return Err(ShortLinkValidationError::InvalidHash);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortHash {
    type Error = ShortLinkValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortHash> for String {
    fn from(value: ShortHash) -> Self {
        value.0
    }
}

impl fmt::Display for ShortHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub original_url: OriginalUrl,
    pub url_hash: ShortHash,
}

/// Inclusive bounds on generated hash length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLength(RangeInclusive<usize>);

impl HashLength {
    /// Validate `min..=max`; bounds must be ordered within `1..=HASH_MAX`.
    pub fn new(min: usize, max: usize) -> Result<Self, ShortLinkValidationError> {
        if min == 0 || min > max || max > HASH_MAX {
            return Err(ShortLinkValidationError::InvalidLengthRange { min, max });
        }
        Ok(Self(min..=max))
    }

    pub fn min(&self) -> usize {
        *self.0.start()
    }

    pub fn max(&self) -> usize {
        *self.0.end()
    }
}

impl Default for HashLength {
    fn default() -> Self {
        Self(6..=10)
    }
}

/// Hash generator backed by the thread-local RNG.
///
/// Lengths are drawn uniformly from the configured range and characters from
/// `[A-Za-z0-9]`.
#[derive(Debug, Clone, Default)]
pub struct RandomShortHashGenerator {
    length: HashLength,
}

impl RandomShortHashGenerator {
    pub fn new(length: HashLength) -> Self {
        Self { length }
    }
}

impl ShortHashGenerator for RandomShortHashGenerator {
    fn generate(&self) -> ShortHash {
        let mut rng = rand::thread_rng();
        let len = rng.gen_range(self.length.0.clone());
        let value: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        ShortHash(value)
    }
}
