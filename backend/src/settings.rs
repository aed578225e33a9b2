//! Application settings loaded via OrthoConfig.
//!
//! Values come from `FOODGRAM_*` environment variables, command-line flags
//! and configuration files. Optional fields fall back to the defaults below
//! through their accessors.

use std::net::{Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    DEFAULT_SHORT_LINK_ATTEMPTS, HashLength, RecipeLimits, ShortLinkValidationError,
};
use crate::inbound::http::state::Presentation;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(5);
const DEFAULT_HASH_MIN_LEN: usize = 6;
const DEFAULT_HASH_MAX_LEN: usize = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the foodgram server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Directory holding uploaded images.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix for uploaded images.
    pub media_url: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`; on unless explicitly disabled.
    pub cookie_secure: Option<bool>,
    /// Default page size and embedded recipe count.
    pub page_size: Option<u32>,
    /// Minimum accepted cooking time in minutes.
    pub min_cooking_time: Option<u32>,
    /// Minimum accepted ingredient amount.
    pub min_amount: Option<u32>,
    pub short_hash_min_len: Option<usize>,
    pub short_hash_max_len: Option<usize>,
    /// Hashes tried before short-link creation gives up.
    pub short_link_attempts: Option<u32>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Rendering settings handed to the HTTP adapter.
    ///
    /// A zero page size is treated as unset.
    pub fn presentation(&self) -> Presentation {
        let page_size = self
            .page_size
            .and_then(NonZeroU32::new)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Presentation {
            media_url: self
                .media_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_URL.to_owned()),
            page_size,
            recipes_limit: page_size,
        }
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Lower bounds for recipe values.
    ///
    /// Zero is treated as unset: the recipe tables reject values below one.
    pub fn recipe_limits(&self) -> RecipeLimits {
        let defaults = RecipeLimits::default();
        RecipeLimits {
            min_cooking_time: self
                .min_cooking_time
                .filter(|value| *value > 0)
                .unwrap_or(defaults.min_cooking_time),
            min_amount: self
                .min_amount
                .filter(|value| *value > 0)
                .unwrap_or(defaults.min_amount),
        }
    }

    /// Short-hash length range.
    ///
    /// # Errors
    ///
    /// Fails when the configured bounds are empty, inverted, or wider than
    /// the stored hash column.
    pub fn hash_length(&self) -> Result<HashLength, ShortLinkValidationError> {
        HashLength::new(
            self.short_hash_min_len.unwrap_or(DEFAULT_HASH_MIN_LEN),
            self.short_hash_max_len.unwrap_or(DEFAULT_HASH_MAX_LEN),
        )
    }

    pub fn short_link_attempts(&self) -> NonZeroU32 {
        self.short_link_attempts
            .and_then(NonZeroU32::new)
            .unwrap_or(DEFAULT_SHORT_LINK_ATTEMPTS)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
