//! Personal recipe collections: favorites and the shopping cart.
//!
//! Both collections are uniqueness-constrained `(user, recipe)` relations
//! with identical rules, so they share one service parameterised by
//! [`MembershipKind`].

use std::fmt;

/// Named personal collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    Favorite,
    ShoppingCart,
}

impl MembershipKind {
    /// Human-readable collection name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }

    /// Message for adding a recipe that is already present.
    pub fn already_present(self, recipe_name: &str) -> String {
        format!("Recipe \"{recipe_name}\" is already in {}.", self.label())
    }

    /// Message for removing a recipe that is not present.
    pub fn not_present(self, recipe_name: &str) -> String {
        format!("Recipe \"{recipe_name}\" is not in {}.", self.label())
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
        })
    }
}
