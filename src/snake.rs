use std::collections::{HashSet, VecDeque};

use crate::grid::{Cell, Direction, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    /// Stepped off the board.
    Wall,
    /// Stepped onto its own body.
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Moved,
    Ate,
    Collision(CollisionKind),
}

/// Snake body, head at the front and tail at the back.
///
/// Always non-empty, free of duplicates, and contiguous: `step` is the only
/// mutation and it keeps all three.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(head: Cell) -> Self {
        Snake {
            body: VecDeque::from([head]),
        }
    }

    /// Builds a snake from head-first cells, or `None` if they do not form a
    /// valid body.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }

        let distinct: HashSet<&Cell> = body.iter().collect();
        if distinct.len() != body.len() {
            return None;
        }

        let contiguous = body
            .iter()
            .zip(body.iter().skip(1))
            .all(|(a, b)| a.manhattan(*b) == 1);
        contiguous.then_some(Snake { body })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Head-first.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    /// Would moving the head onto `cell` hit the body? The tail only counts
    /// when it stays put, i.e. when the snake is growing this step.
    fn would_collide_with_body(&self, cell: Cell, growing: bool) -> bool {
        if !growing && cell == self.tail() {
            return false;
        }
        self.contains(cell)
    }

    /// Advances one cell in `direction`, growing by one if the new head lands
    /// on `food`. On a collision the body is left untouched.
    pub fn step(&mut self, direction: Direction, grid: Grid, food: Cell) -> StepResult {
        let new_head = self.head().stepped(direction);

        if !grid.in_bounds(new_head) {
            return StepResult::Collision(CollisionKind::Wall);
        }

        let ate = new_head == food;
        if self.would_collide_with_body(new_head, ate) {
            return StepResult::Collision(CollisionKind::Body);
        }

        if !ate {
            self.body.pop_back();
        }
        self.body.push_front(new_head);

        if ate {
            StepResult::Ate
        } else {
            StepResult::Moved
        }
    }
}
