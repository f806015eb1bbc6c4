//! Fixed-size print batches

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Labels per physical print row. The stock is a three-across ribbon,
/// so every dispatch to the device covers exactly three positions.
pub const BATCH_SLOTS: usize = 3;

/// One label position in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrintSlot {
    Filled { product: Product },
    Empty,
}

impl PrintSlot {
    pub fn is_filled(&self) -> bool {
        matches!(self, PrintSlot::Filled { .. })
    }
}

/// A row of exactly [`BATCH_SLOTS`] slots, trailing positions padded
/// with `Empty` when the flattened label sequence runs out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintBatch {
    pub slots: [PrintSlot; BATCH_SLOTS],
}

impl PrintBatch {
    /// Build a batch from up to [`BATCH_SLOTS`] products, right-padding
    /// with empty slots. Extra products beyond the slot count are ignored.
    pub fn from_products(products: &[Product]) -> Self {
        let mut slots = [const { PrintSlot::Empty }; BATCH_SLOTS];
        for (slot, product) in slots.iter_mut().zip(products.iter()) {
            *slot = PrintSlot::Filled {
                product: product.clone(),
            };
        }
        Self { slots }
    }

    /// Number of filled slots.
    pub fn label_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }

    pub fn filled(&self) -> impl Iterator<Item = &Product> {
        self.slots.iter().filter_map(|s| match s {
            PrintSlot::Filled { product } => Some(product),
            PrintSlot::Empty => None,
        })
    }
}
