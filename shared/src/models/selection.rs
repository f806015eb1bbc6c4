//! Print selection: insertion-ordered product → quantity mapping

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::product::Product;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("product {0} has no quantity set")]
    UnsetQuantity(i64),

    #[error("product {0} has zero quantity")]
    ZeroQuantity(i64),

    #[error("selection is empty")]
    Empty,
}

/// A product picked for printing, with its requested label count.
///
/// `quantity: None` is the transient "unset" state while the operator is
/// still typing; a committed selection must have `Some(q)` with `q >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedProduct {
    pub product: Product,
    pub quantity: Option<u32>,
}

impl SelectedProduct {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity: Some(quantity),
        }
    }
}

/// Insertion-ordered selection map keyed by product id.
///
/// Backed by a plain vector of pairs rather than any keyed map: product
/// ids are numeric, and a map that re-sorts integer-like keys would
/// silently print labels in id order instead of the order the operator
/// added them. Removing and re-adding a product moves it to the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionMap {
    entries: Vec<(i64, SelectedProduct)>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a selection entry.
    ///
    /// An existing product keeps its position; a new one is appended.
    pub fn insert(&mut self, id: i64, selected: SelectedProduct) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == id) {
            entry.1 = selected;
        } else {
            self.entries.push((id, selected));
        }
    }

    /// Remove a product from the selection.
    pub fn remove(&mut self, id: i64) -> Option<SelectedProduct> {
        let pos = self.entries.iter().position(|(k, _)| *k == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, id: i64) -> Option<&SelectedProduct> {
        self.entries.iter().find(|(k, _)| *k == id).map(|(_, v)| v)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &SelectedProduct)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total labels a committed selection will produce.
    ///
    /// Unset quantities count as one, matching the flattening rule.
    pub fn total_labels(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, s)| s.quantity.unwrap_or(1) as usize)
            .sum()
    }

    /// Check that every entry carries a committed, positive quantity.
    ///
    /// Runs before the selection reaches the scheduler; the unset
    /// sentinel must never survive past this point.
    pub fn validate_committed(&self) -> Result<(), SelectionError> {
        if self.entries.is_empty() {
            return Err(SelectionError::Empty);
        }
        for (id, selected) in &self.entries {
            match selected.quantity {
                None => return Err(SelectionError::UnsetQuantity(*id)),
                Some(0) => return Err(SelectionError::ZeroQuantity(*id)),
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: Some(id),
            product_code: format!("{:04}", id),
            name: name.to_string(),
            name_short: name.to_string(),
            barcode: format!("789846581{:03}7", id),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut selection = SelectionMap::new();
        // Deliberately descending ids: order must not follow the key.
        selection.insert(30, SelectedProduct::new(product(30, "C"), 1));
        selection.insert(20, SelectedProduct::new(product(20, "B"), 1));
        selection.insert(10, SelectedProduct::new(product(10, "A"), 1));

        let ids: Vec<i64> = selection.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut selection = SelectionMap::new();
        selection.insert(1, SelectedProduct::new(product(1, "A"), 1));
        selection.insert(2, SelectedProduct::new(product(2, "B"), 1));
        selection.insert(1, SelectedProduct::new(product(1, "A"), 5));

        let ids: Vec<i64> = selection.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(selection.get(1).unwrap().quantity, Some(5));
    }

    #[test]
    fn test_remove_and_readd_moves_to_end() {
        let mut selection = SelectionMap::new();
        selection.insert(1, SelectedProduct::new(product(1, "A"), 1));
        selection.insert(2, SelectedProduct::new(product(2, "B"), 1));
        selection.remove(1);
        selection.insert(1, SelectedProduct::new(product(1, "A"), 1));

        let ids: Vec<i64> = selection.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_validate_committed_rejects_unset() {
        let mut selection = SelectionMap::new();
        selection.insert(
            1,
            SelectedProduct {
                product: product(1, "A"),
                quantity: None,
            },
        );
        assert_eq!(
            selection.validate_committed(),
            Err(SelectionError::UnsetQuantity(1))
        );
    }

    #[test]
    fn test_validate_committed_rejects_zero() {
        let mut selection = SelectionMap::new();
        selection.insert(1, SelectedProduct::new(product(1, "A"), 0));
        assert_eq!(
            selection.validate_committed(),
            Err(SelectionError::ZeroQuantity(1))
        );
    }

    #[test]
    fn test_validate_committed_rejects_empty() {
        assert_eq!(
            SelectionMap::new().validate_committed(),
            Err(SelectionError::Empty)
        );
    }

    #[test]
    fn test_total_labels() {
        let mut selection = SelectionMap::new();
        selection.insert(1, SelectedProduct::new(product(1, "A"), 4));
        selection.insert(2, SelectedProduct::new(product(2, "B"), 2));
        assert_eq!(selection.total_labels(), 6);
    }
}
