//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::domain::ImagePath;
use crate::domain::ports::{
    AccountsCommand, CatalogueQuery, MembershipCommand, RecipesCommand, RecipesQuery,
    ShoppingListQuery, ShortLinkCommand, SubscriptionsCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub short_links: Arc<dyn ShortLinkCommand>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
}

/// Response rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Public prefix for stored images, e.g. `/media` or
    /// `https://cdn.example/media`.
    pub media_url: String,
    /// Page size when the request carries no usable `limit`.
    pub page_size: NonZeroU32,
    /// Recipes embedded per author card when `recipes_limit` is absent.
    pub recipes_limit: NonZeroU32,
}

impl Presentation {
    /// Public URL for a stored image.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::ImagePath;
    /// use foodgram::inbound::http::state::Presentation;
    ///
    /// let presentation = Presentation::default();
    /// let path = ImagePath::new("recipes/soup.png").expect("path");
    /// assert_eq!(presentation.image_url(&path), "/media/recipes/soup.png");
    /// ```
    pub fn image_url(&self, path: &ImagePath) -> String {
        format!("{}/{}", self.media_url.trim_end_matches('/'), path.as_str())
    }

    /// Undo [`Self::image_url`] for image URLs echoed back by clients.
    pub fn image_reference<'a>(&self, raw: &'a str) -> &'a str {
        let raw = raw.trim();
        raw.strip_prefix(self.media_url.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(raw)
    }
}

impl Default for Presentation {
    fn default() -> Self {
        let six = NonZeroU32::MIN.saturating_add(5);
        Self {
            media_url: "/media".to_owned(),
            page_size: six,
            recipes_limit: six,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub short_links: Arc<dyn ShortLinkCommand>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub presentation: Presentation,
}

impl HttpState {
    /// Construct state from the port bundle and rendering settings.
    pub fn new(ports: HttpStatePorts, presentation: Presentation) -> Self {
        let HttpStatePorts {
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            memberships,
            shopping_list,
            short_links,
            subscriptions,
        } = ports;
        Self {
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            memberships,
            shopping_list,
            short_links,
            subscriptions,
            presentation,
        }
    }
}
