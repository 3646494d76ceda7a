use std::collections::HashSet;

use log::warn;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::grid::{Cell, Grid};

/// Random draws tried before falling back to enumerating the free cells.
pub const MAX_REJECTION_TRIES: usize = 64;

/// Places food on a uniformly random free cell.
#[derive(Debug)]
pub struct FoodSpawner<R: Rng = StdRng> {
    rng: R,
}

impl FoodSpawner<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        FoodSpawner::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        FoodSpawner::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(rng: R) -> Self {
        FoodSpawner { rng }
    }

    /// A free cell, or `None` when `occupied` covers the whole board.
    ///
    /// Rejection sampling is cheap while the board is mostly empty; once
    /// `MAX_REJECTION_TRIES` draws have all landed on the snake, the free
    /// cells are enumerated and one is chosen directly.
    pub fn spawn(&mut self, grid: Grid, occupied: &HashSet<Cell>) -> Option<Cell> {
        if grid.area() == 0 {
            return None;
        }

        for _ in 0..MAX_REJECTION_TRIES {
            let cell = Cell::new(
                self.rng.gen_range(0..i32::from(grid.cols)),
                self.rng.gen_range(0..i32::from(grid.rows)),
            );
            if !occupied.contains(&cell) {
                return Some(cell);
            }
        }

        let chosen = grid
            .cells()
            .filter(|cell| !occupied.contains(cell))
            .choose(&mut self.rng);
        if chosen.is_none() {
            warn!("No free cell left for food on a {}x{} board", grid.cols, grid.rows);
        }
        chosen
    }
}
