/// A square on the board. Signed so that a step off the edge is still a
/// representable cell that `Grid::in_bounds` can reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    pub fn stepped(&self, direction: Direction) -> Cell {
        let (dc, dr) = direction.delta();
        Cell {
            col: self.col + dc,
            row: self.row + dr,
        }
    }

    pub fn manhattan(&self, other: Cell) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((col, row): (i32, i32)) -> Self {
        Cell { col, row }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour expansion order. Pathfinding relies on it being fixed.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// `(d_col, d_row)`; rows grow downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction leading from `from` to the adjacent cell `to`, if they
    /// are adjacent.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| from.stepped(*direction) == to)
    }
}

/// Static board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols: u16,
    pub rows: u16,
}

impl Grid {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Grid { cols, rows }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && cell.col < i32::from(self.cols)
            && cell.row < i32::from(self.rows)
    }

    pub fn area(&self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (cols, rows) = (i32::from(self.cols), i32::from(self.rows));
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Cell { col, row }))
    }
}
