//! The falling pair: two cells moved and rotated as a rigid unit until it locks.

use crate::playfield::{Cell, CellColor, Playfield};

/// One half of a capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCell {
    pub x: i32,
    pub y: i32,
    pub color: CellColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Moved,
    /// Something is directly below; the pair should lock.
    Blocked,
}

/// Falling pair. cells[0] is the rotation pivot.
/// The pair lives outside the playfield until `lock_into`, so collision checks only
/// ever test playfield cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingPair {
    cells: [PairCell; 2],
}

impl FallingPair {
    /// Horizontal pair with the pivot at (x, y) and its partner at (x + 1, y).
    pub fn new(x: i32, y: i32, colors: [CellColor; 2]) -> Self {
        Self {
            cells: [
                PairCell {
                    x,
                    y,
                    color: colors[0],
                },
                PairCell {
                    x: x + 1,
                    y,
                    color: colors[1],
                },
            ],
        }
    }

    pub fn cells(&self) -> &[PairCell; 2] {
        &self.cells
    }

    pub fn positions(&self) -> [(i32, i32); 2] {
        self.cells.map(|c| (c.x, c.y))
    }

    #[cfg(test)]
    pub fn colors(&self) -> [CellColor; 2] {
        self.cells.map(|c| c.color)
    }

    /// True if the pair overlaps something in the playfield or sticks out of it.
    pub fn collides(&self, pf: &Playfield) -> bool {
        !self.positions().iter().all(|&(x, y)| pf.is_free(x, y))
    }

    /// Commit `next` if every successor position is free.
    fn try_positions(&mut self, next: [(i32, i32); 2], pf: &Playfield) -> bool {
        if !next.iter().all(|&(x, y)| pf.is_free(x, y)) {
            return false;
        }
        for (cell, (x, y)) in self.cells.iter_mut().zip(next) {
            cell.x = x;
            cell.y = y;
        }
        true
    }

    pub fn try_move(&mut self, dx: i32, dy: i32, pf: &Playfield) -> bool {
        let next = self.positions().map(|(x, y)| (x + dx, y + dy));
        self.try_positions(next, pf)
    }

    /// Rotate 90° about the pivot: relative offset (rx, ry) becomes (-ry, rx).
    /// With y pointing down that turns right → below → left → above.
    pub fn try_rotate(&mut self, pf: &Playfield) -> bool {
        let (px, py) = (self.cells[0].x, self.cells[0].y);
        let next = self.positions().map(|(x, y)| {
            let (rx, ry) = (x - px, y - py);
            (px - ry, py + rx)
        });
        self.try_positions(next, pf)
    }

    pub fn drop_step(&mut self, pf: &Playfield) -> DropOutcome {
        if self.try_move(0, 1, pf) {
            DropOutcome::Moved
        } else {
            DropOutcome::Blocked
        }
    }

    /// Write both halves into the playfield as ordinary cells. Consumes the pair.
    pub fn lock_into(self, pf: &mut Playfield) {
        for c in self.cells {
            if c.x >= 0 && c.y >= 0 {
                pf.place(Cell::ordinary(c.color), c.x as usize, c.y as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: CellColor = CellColor::Red;
    const B: CellColor = CellColor::Blue;

    #[test]
    fn test_new_is_horizontal() {
        let pair = FallingPair::new(4, 0, [R, B]);
        assert_eq!(pair.positions(), [(4, 0), (5, 0)]);
        assert_eq!(pair.colors(), [R, B]);
    }

    #[test]
    fn test_move_blocked_by_walls() {
        let pf = Playfield::new(4, 6);
        let mut pair = FallingPair::new(0, 0, [R, B]);
        assert!(!pair.try_move(-1, 0, &pf));
        assert!(pair.try_move(1, 0, &pf));
        assert!(pair.try_move(1, 0, &pf));
        assert!(!pair.try_move(1, 0, &pf));
        assert_eq!(pair.positions(), [(2, 0), (3, 0)]);
    }

    #[test]
    fn test_move_blocked_by_cells() {
        let mut pf = Playfield::new(4, 6);
        pf.place(Cell::ordinary(B), 3, 1);
        let mut pair = FallingPair::new(1, 1, [R, B]);
        assert!(!pair.try_move(1, 0, &pf));
        assert_eq!(pair.positions(), [(1, 1), (2, 1)]);
    }

    #[test]
    fn test_rotation_cycle() {
        let pf = Playfield::new(6, 6);
        let mut pair = FallingPair::new(2, 2, [R, B]);
        assert!(pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 2), (2, 3)]);
        assert!(pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 2), (1, 2)]);
        assert!(pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 2), (2, 1)]);
        assert!(pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 2), (3, 2)]);
    }

    #[test]
    fn test_rotation_rejected_when_target_occupied() {
        let mut pf = Playfield::new(6, 6);
        pf.place(Cell::ordinary(R), 2, 3);
        let mut pair = FallingPair::new(2, 2, [R, B]);
        assert!(!pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 2), (3, 2)]);
    }

    #[test]
    fn test_rotation_rejected_above_top() {
        let pf = Playfield::new(6, 6);
        let mut pair = FallingPair::new(2, 0, [R, B]);
        assert!(pair.try_rotate(&pf));
        assert!(pair.try_rotate(&pf));
        // Next turn would put the partner at y = -1.
        assert!(!pair.try_rotate(&pf));
        assert_eq!(pair.positions(), [(2, 0), (1, 0)]);
    }

    #[test]
    fn test_drop_until_floor_then_lock() {
        let mut pf = Playfield::new(4, 3);
        let mut pair = FallingPair::new(1, 0, [R, B]);
        assert_eq!(pair.drop_step(&pf), DropOutcome::Moved);
        assert_eq!(pair.drop_step(&pf), DropOutcome::Moved);
        assert_eq!(pair.drop_step(&pf), DropOutcome::Blocked);
        pair.lock_into(&mut pf);
        assert_eq!(pf.get(1, 2), Some(Cell::ordinary(R)));
        assert_eq!(pf.get(2, 2), Some(Cell::ordinary(B)));
        assert_eq!(pf.remaining_seed_count(), 0);
    }

    #[test]
    fn test_half_supported_pair_is_blocked() {
        let mut pf = Playfield::new(4, 6);
        pf.seed(&[(2, 5)], &[B]);
        let mut pair = FallingPair::new(1, 4, [R, B]);
        assert_eq!(pair.drop_step(&pf), DropOutcome::Blocked);
    }

    #[test]
    fn test_collides_on_spawn() {
        let mut pf = Playfield::new(4, 6);
        let pair = FallingPair::new(1, 0, [R, B]);
        assert!(!pair.collides(&pf));
        pf.place(Cell::ordinary(R), 2, 0);
        assert!(pair.collides(&pf));
    }
}
