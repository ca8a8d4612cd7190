//! Allocation recompute.

use crate::Asset;

/// Recompute each asset's percentage share of total portfolio value,
/// rounded to one decimal place.
///
/// A zero total leaves the collection untouched. The per-asset rounding
/// means the shares sum to 100 only within a cumulative error of 0.1 per
/// asset.
pub fn recalculate_allocation(assets: &mut [Asset]) {
    let total: f64 = assets.iter().map(|asset| asset.value).sum();
    if total == 0.0 {
        return;
    }

    for asset in assets.iter_mut() {
        asset.allocation = round1(asset.value / total * 100.0);
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
