//! Dimension resolution: requested size -> nearest enclosing panel price.

use crate::catalog::PriceGrid;

/// Find the price of the smallest panel that fits the requested dimensions.
///
/// The grid is sorted by width ascending then height ascending, so a linear
/// scan returns the first cell with `width >= requested && height >=
/// requested` — the smallest qualifying width and, within it, the smallest
/// qualifying height. This is a deliberate round-up-to-next-panel-size
/// lookup; no interpolation between cells happens.
///
/// Returns `None` when nothing dominates the request: the grid is empty, or
/// either requested dimension exceeds every cell on its axis (the predicate
/// is conjunctive — being in range on one axis alone is not enough).
#[must_use]
pub fn find_price(grid: &PriceGrid, width: u32, height: u32) -> Option<u32> {
    grid.cells()
        .iter()
        .find(|cell| cell.width >= width && cell.height >= height)
        .map(|cell| cell.price)
}
