//! Playfield: fixed-size grid of optional cells plus the running seed count.

/// Capsule and seed colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl CellColor {
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Colour index 0..4 for theme.cell_color().
    pub fn index(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
        }
    }
}

/// Ordinary cells come from locked capsules; seeds are pre-placed and must all be cleared to win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Ordinary,
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub color: CellColor,
    pub kind: CellKind,
}

impl Cell {
    pub const fn ordinary(color: CellColor) -> Self {
        Self {
            color,
            kind: CellKind::Ordinary,
        }
    }

    pub const fn seed(color: CellColor) -> Self {
        Self {
            color,
            kind: CellKind::Seed,
        }
    }

    #[inline]
    pub fn is_seed(&self) -> bool {
        self.kind == CellKind::Seed
    }
}

/// Playfield: grid of optional cells. y=0 is top; rows are stored [0..height].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    pub width: usize,
    pub height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: Vec<Vec<Option<Cell>>>,
    /// Seeds still on the board. Only `seed()` raises it and only `take()` lowers it.
    seed_count: u32,
}

impl Playfield {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![None; width]; height],
            seed_count: 0,
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell at (x, y); None when empty or out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    /// True if (x, y) is inside the grid and empty. Signed so capsule moves can probe past the edges.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.is_occupied(x as usize, y as usize)
    }

    /// Insert a cell, replacing whatever was there. Out-of-bounds placement is ignored.
    /// Never touches the seed count: seeds go in through `seed()`.
    pub fn place(&mut self, cell: Cell, x: usize, y: usize) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = Some(cell);
        }
    }

    /// Place seed cells at `positions` with the matching entry of `colors`.
    /// Returns how many new seeds landed; the seed count grows by exactly that much.
    /// Out-of-bounds positions are skipped and a position already holding a seed is
    /// recoloured without counting again.
    pub fn seed(&mut self, positions: &[(usize, usize)], colors: &[CellColor]) -> u32 {
        let mut placed = 0u32;
        for (&(x, y), &color) in positions.iter().zip(colors) {
            if x >= self.width || y >= self.height {
                continue;
            }
            if !self.get(x, y).is_some_and(|c| c.is_seed()) {
                placed += 1;
            }
            self.place(Cell::seed(color), x, y);
        }
        self.seed_count += placed;
        placed
    }

    #[inline]
    pub fn remaining_seed_count(&self) -> u32 {
        self.seed_count
    }

    /// Remove and return the cell at (x, y), keeping the seed count in step.
    pub(crate) fn take(&mut self, x: usize, y: usize) -> Option<Cell> {
        let cell = self.rows.get_mut(y).and_then(|row| row.get_mut(x))?.take()?;
        if cell.is_seed() {
            self.seed_count = self.seed_count.saturating_sub(1);
        }
        Some(cell)
    }

    /// Swap two slots in the same grid. Used by gravity; seed count is unaffected.
    pub(crate) fn swap(&mut self, (ax, ay): (usize, usize), (bx, by): (usize, usize)) {
        let a = self.rows[ay][ax];
        self.rows[ay][ax] = self.rows[by][bx];
        self.rows[by][bx] = a;
    }

    #[cfg(test)]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// All occupied slots as (x, y, cell), row by row from the top.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, c)| c.map(|cell| (x, y, cell)))
        })
    }
}
