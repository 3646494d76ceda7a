//! A* search over the 4-connected board.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{Cell, Direction, Grid};

/// Heap key. Ordered by f-score, then heuristic, then insertion order, so
/// equal-cost frontiers always expand in the same sequence.
type OpenEntry = Reverse<(u32, u32, u64, Cell)>;

/// Shortest path from `start` to `goal` that avoids `blocked`.
///
/// The returned cells exclude `start` and end with `goal`. An empty path
/// means the goal is unreachable (or already reached); that is an ordinary
/// answer, not a failure. `goal` itself is never treated as blocked.
pub fn find_path(grid: Grid, start: Cell, goal: Cell, blocked: &HashSet<Cell>) -> Vec<Cell> {
    if start == goal || !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return Vec::new();
    }

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut g_score: HashMap<Cell, u32> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut sequence = 0u64;

    g_score.insert(start, 0);
    let h = start.manhattan(goal);
    open.push(Reverse((h, h, sequence, start)));

    while let Some(Reverse((f, _, _, current))) = open.pop() {
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }

        let g = g_score.get(&current).copied().unwrap_or(u32::MAX);
        // Superseded by a cheaper route pushed later.
        if f > g + current.manhattan(goal) {
            continue;
        }

        for direction in Direction::ALL {
            let neighbour = current.stepped(direction);
            if !grid.in_bounds(neighbour) {
                continue;
            }
            if neighbour != goal && blocked.contains(&neighbour) {
                continue;
            }

            let tentative = g + 1;
            if tentative < g_score.get(&neighbour).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbour, current);
                g_score.insert(neighbour, tentative);
                let h = neighbour.manhattan(goal);
                sequence += 1;
                open.push(Reverse((tentative + h, h, sequence, neighbour)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        if previous == start {
            break;
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
