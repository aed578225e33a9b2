//! Consolidated shopping list derived from a user's cart.
//!
//! Every ingredient occurrence across the cart's recipes contributes its
//! amount to the line keyed by `(name, measurement_unit)`. Lines are ordered
//! by that key, so the rendered list is stable for the same cart contents.

use std::collections::BTreeMap;
use std::fmt;

/// One ingredient occurrence in a cart recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPortion {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// Summed quantity for one `(name, measurement_unit)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

impl fmt::Display for ShoppingListLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.name, self.amount, self.measurement_unit)
    }
}

/// Aggregated shopping list.
///
/// # Examples
/// ```
/// use foodgram::domain::{CartPortion, ShoppingList};
///
/// let salt = |amount| CartPortion {
///     name: "Salt".into(),
///     measurement_unit: "g".into(),
///     amount,
/// };
/// let list = ShoppingList::aggregate([salt(10), salt(5)]);
/// assert_eq!(list.render(), "Salt - 15 (g)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    lines: Vec<ShoppingListLine>,
}

impl ShoppingList {
    /// Group portions by `(name, measurement_unit)` and sum their amounts.
    pub fn aggregate(portions: impl IntoIterator<Item = CartPortion>) -> Self {
        let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
        for portion in portions {
            let total = totals
                .entry((portion.name, portion.measurement_unit))
                .or_default();
            *total = total.saturating_add(u64::from(portion.amount));
        }
        let lines = totals
            .into_iter()
            .map(|((name, measurement_unit), amount)| ShoppingListLine {
                name,
                measurement_unit,
                amount,
            })
            .collect();
        Self { lines }
    }

    /// Lines in `(name, measurement_unit)` order.
    pub fn lines(&self) -> &[ShoppingListLine] {
        &self.lines
    }

    /// Whether the cart contributed no ingredients.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text rendering, one line per ingredient.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
