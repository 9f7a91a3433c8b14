//! Allocation engine.
//!
//! Greedily consumes inventory lots, in the order given, until a requested
//! quantity is covered. Allocation is all-or-nothing: when the lots cannot
//! cover the request, no lot is touched.

use comerce_domain::catalog::InventoryLot;
use comerce_domain::LotId;

/// Outcome of allocating one line item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Allocation {
    /// `(lot, amount taken)` in consumption order. Lots that gave nothing are
    /// not listed.
    pub consumed: Vec<(LotId, u32)>,
    /// Quantity the lots could not cover.
    pub shortfall: u32,
}

impl Allocation {
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    pub fn total_taken(&self) -> u32 {
        self.consumed.iter().map(|(_, n)| *n).sum()
    }

    /// Whether `lot` gave anything.
    pub fn touches(&self, lot: &LotId) -> bool {
        self.consumed.iter().any(|(id, _)| id == lot)
    }
}

/// Work out what allocating `requested` would take, without mutating lots.
pub fn plan(requested: u32, lots: &[InventoryLot]) -> Allocation {
    let mut remaining = requested;
    let mut consumed = Vec::new();

    for lot in lots {
        if remaining == 0 {
            break;
        }
        let taken = remaining.min(lot.on_hand);
        if taken > 0 {
            consumed.push((lot.id.clone(), taken));
            remaining -= taken;
        }
    }

    Allocation {
        consumed,
        shortfall: remaining,
    }
}

/// Allocate `requested` units from `lots`.
///
/// On success every consumed lot's `on_hand` is decremented by exactly its
/// amount taken. With a non-zero shortfall the lots are left untouched.
pub fn allocate(requested: u32, lots: &mut [InventoryLot]) -> Allocation {
    let allocation = plan(requested, lots);
    if !allocation.is_complete() {
        return allocation;
    }

    for (lot_id, amount) in &allocation.consumed {
        if let Some(lot) = lots.iter_mut().find(|l| &l.id == lot_id) {
            lot.take(*amount);
        }
    }
    allocation
}
