use std::collections::VecDeque;

use crate::grid::Point;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Direction after a steering request: reversals are ignored.
    pub fn steer(self, requested: Direction) -> Direction {
        if requested == self.opposite() {
            self
        } else {
            requested
        }
    }
}

/// The snake's body, head first.
///
/// Never empty, and never longer than `capacity` (the number of cells on the
/// board).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Point>,
    capacity: usize,
}

impl Snake {
    /// Lays the snake out in a straight line, head at `head` and the rest of
    /// the body trailing behind it, opposite to `facing`.
    pub fn new(head: Point, size: usize, facing: Direction, capacity: usize) -> Self {
        let (dx, dy) = facing.opposite().delta();
        let size = size.clamp(1, capacity.max(1));

        let body = (0..size as i32)
            .map(|i| head.offset(dx * i, dy * i))
            .collect();
        Snake { body, capacity }
    }

    #[cfg(test)]
    pub fn from_segments(segments: Vec<Point>, capacity: usize) -> Self {
        assert!(!segments.is_empty() && segments.len() <= capacity);
        Snake { body: segments.into(), capacity }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, p: Point) -> bool {
        self.body.contains(&p)
    }

    /// Where the head ends up after one step in `direction`.
    pub fn next_head(&self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        self.head().offset(dx, dy)
    }

    /// Whether a head moving onto `p` would hit the body. The tail is left out
    /// since it moves away during the same step.
    pub fn bites(&self, p: Point) -> bool {
        let keep = self.body.len() - 1;
        self.body.iter().take(keep).any(|seg| *seg == p)
    }

    /// Moves the whole body one step forward. With `grow` the old tail cell
    /// stays occupied, unless the snake already fills the board.
    pub fn advance(&mut self, direction: Direction, grow: bool) {
        let new_head = self.next_head(direction);
        self.body.push_front(new_head);

        if !grow || self.body.len() > self.capacity {
            self.body.pop_back();
        }
    }
}
