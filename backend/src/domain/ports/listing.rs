//! Counted slice of a larger result set.

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(total: u64, items: Vec<T>) -> Self {
        Self { total, items }
    }

    pub fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }
}
