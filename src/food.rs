use std::collections::HashSet;

use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::grid::{Grid, Point};
use crate::snake::Snake;

/// Random draws tried before falling back to listing the free cells.
const MAX_RANDOM_DRAWS: usize = 64;

/// Picks a random free cell for the next piece of food.
///
/// Returns `None` only when the snake covers the whole board.
pub fn place_food<R: Rng>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Point> {
    if snake.len() >= grid.cell_count() {
        return None;
    }

    for _ in 0..MAX_RANDOM_DRAWS {
        let candidate = Point::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    // Crowded board, pick straight from what's left
    let taken: HashSet<Point> = snake.segments().collect();
    let free: Vec<Point> = grid.cells().filter(|p| !taken.contains(p)).collect();
    debug!("food fallback: {} free cells left", free.len());

    free.choose(rng).copied()
}
