/// A cell on the board. `(0, 0)` is the top-left playable cell, `y` grows
/// downwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Bounds of the playing field.
///
/// Playable cells are `0 <= x < width` and `0 <= y < height`. The walls sit
/// just outside that range, at `x == -1`, `x == width`, `y == -1` and
/// `y == height`, and that is also where they get drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Grid { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    pub fn cell_count(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    /// Every playable cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }
}
