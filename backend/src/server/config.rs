//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use foodgram::domain::{HashLength, RecipeLimits};
use foodgram::inbound::http::state::Presentation;
use foodgram::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) media_root: PathBuf,
    pub(crate) presentation: Presentation,
    pub(crate) recipe_limits: RecipeLimits,
    pub(crate) hash_length: HashLength,
    pub(crate) short_link_attempts: NonZeroU32,
}

impl ServerConfig {
    /// Construct a server configuration around a connected pool.
    ///
    /// Domain limits start at their defaults; override them with the `with_*`
    /// methods.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        media_root: PathBuf,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            db_pool,
            media_root,
            presentation: Presentation::default(),
            recipe_limits: RecipeLimits::default(),
            hash_length: HashLength::default(),
            short_link_attempts: foodgram::domain::DEFAULT_SHORT_LINK_ATTEMPTS,
        }
    }

    /// Set how responses render image URLs and default page sizes.
    #[must_use]
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    #[must_use]
    pub fn with_recipe_limits(mut self, limits: RecipeLimits) -> Self {
        self.recipe_limits = limits;
        self
    }

    /// Configure short-link hash generation.
    #[must_use]
    pub fn with_short_links(mut self, hash_length: HashLength, attempts: NonZeroU32) -> Self {
        self.hash_length = hash_length;
        self.short_link_attempts = attempts;
        self
    }
}
