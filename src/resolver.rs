//! Match detection, removal, gravity collapse and the chain loop.
//!
//! A match is exactly [`RUN_LENGTH`] consecutive same-colour cells starting at some cell
//! and extending right or down. Every start cell is checked on its own, so a run of five
//! or more is covered by overlapping windows and removed whole in one pass. Diagonals
//! never match.

use crate::playfield::Playfield;
use std::collections::BTreeSet;

pub const RUN_LENGTH: usize = 4;

/// Result of running the chain loop to its fixpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// Passes that removed at least one cell.
    pub chains: u32,
    /// Cells removed across all passes.
    pub removed: usize,
    /// Seed cells among the removed.
    pub seeds_cleared: u32,
}

/// Coordinates (x, y) covered by a horizontal or vertical run of four.
pub fn find_matches(pf: &Playfield) -> BTreeSet<(usize, usize)> {
    let mut marked = BTreeSet::new();
    for (x, y, cell) in pf.cells() {
        let same = |cx: usize, cy: usize| pf.get(cx, cy).is_some_and(|c| c.color == cell.color);

        if x + RUN_LENGTH <= pf.width && (1..RUN_LENGTH).all(|i| same(x + i, y)) {
            marked.extend((0..RUN_LENGTH).map(|i| (x + i, y)));
        }
        if y + RUN_LENGTH <= pf.height && (1..RUN_LENGTH).all(|i| same(x, y + i)) {
            marked.extend((0..RUN_LENGTH).map(|i| (x, y + i)));
        }
    }
    marked
}

/// One detect-and-remove pass. Returns the number of distinct cells removed.
pub fn resolve(pf: &mut Playfield) -> usize {
    let marked = find_matches(pf);
    for &(x, y) in &marked {
        pf.take(x, y);
    }
    marked.len()
}

/// Collapse every column so filled cells sit contiguously at the bottom.
/// Scans each column bottom to top, pulling the nearest filled cell above into each gap.
/// Returns true if any cell moved.
pub fn apply_gravity(pf: &mut Playfield) -> bool {
    let mut moved = false;
    for x in 0..pf.width {
        for y in (0..pf.height).rev() {
            if pf.is_occupied(x, y) {
                continue;
            }
            let above = (0..y).rev().find(|&ay| pf.is_occupied(x, ay));
            if let Some(ay) = above {
                pf.swap((x, y), (x, ay));
                moved = true;
            } else {
                // Nothing left above this gap.
                break;
            }
        }
    }
    moved
}

/// Detect, remove and collapse until a pass removes nothing.
pub fn run_chain(pf: &mut Playfield) -> ChainReport {
    let mut report = ChainReport::default();
    let seeds_before = pf.remaining_seed_count();
    loop {
        let removed = resolve(pf);
        if removed == 0 {
            break;
        }
        report.chains += 1;
        report.removed += removed;
        apply_gravity(pf);
    }
    report.seeds_cleared = seeds_before - pf.remaining_seed_count();
    report
}
