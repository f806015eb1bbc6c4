//! Selection flattening and batch partitioning

use shared::{BATCH_SLOTS, PrintBatch, Product, SelectionMap};

/// Expand a selection into the flat ordered label queue.
///
/// Each product repeats `quantity` times, in the selection's
/// insertion order. An unset quantity counts as one; committed
/// selections are validated upstream so it should not occur here.
pub fn flatten(selection: &SelectionMap) -> Vec<Product> {
    let mut queue = Vec::with_capacity(selection.total_labels());
    for (_, selected) in selection.iter() {
        let quantity = selected.quantity.unwrap_or(1);
        for _ in 0..quantity {
            queue.push(selected.product.clone());
        }
    }
    queue
}

/// Partition the flat queue into device batches of exactly
/// [`BATCH_SLOTS`] slots, the final batch right-padded with empties.
pub fn partition(queue: &[Product]) -> Vec<PrintBatch> {
    queue.chunks(BATCH_SLOTS).map(PrintBatch::from_products).collect()
}
