use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::food::place_food;
use crate::grid::{Grid, Point};
use crate::snake::{Direction, Snake};
use crate::term::Key;

/// Why a session stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Wall,
    SelfBite,
    Quit,
    /// The snake filled the board and there is nowhere left for food.
    BoardCleared,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver(Ending),
}

/// Everything the terminal needs to draw one frame.
pub struct Snapshot<'a> {
    pub grid: Grid,
    pub snake: &'a Snake,
    pub direction: Direction,
    pub food: Option<Point>,
    pub score: u32,
    pub best_score: u32,
    pub phase: Phase,
}

/// State of one play-through, from spawn to game over.
pub struct Game {
    grid: Grid,
    snake: Snake,
    direction: Direction,
    food: Option<Point>,
    score: u32,
    phase: Phase,
}

impl Game {
    /// Fresh session: snake in the middle facing right, food somewhere free.
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let grid = Grid::new(config.width, config.height);
        let direction = Direction::Right;
        let snake = Snake::new(grid.center(), config.initial_length, direction, grid.cell_count());
        let food = place_food(&grid, &snake, rng);

        Game { grid, snake, direction, food, score: 0, phase: Phase::Running }
    }

    #[cfg(test)]
    pub fn with_state(grid: Grid, snake: Snake, direction: Direction, food: Option<Point>) -> Self {
        Game { grid, snake, direction, food, score: 0, phase: Phase::Running }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Turns the snake, unless that would send it straight back into itself.
    pub fn set_direction(&mut self, requested: Direction) {
        self.direction = self.direction.steer(requested);
    }

    /// Runs one game step with at most one key press.
    ///
    /// Order matters: input, wall check, body check, then the move itself and
    /// eating. A crash leaves the snake where it was so every segment stays on
    /// the board.
    pub fn tick<R: Rng>(&mut self, input: Option<Key>, rng: &mut R) -> Phase {
        if self.is_over() {
            return self.phase;
        }

        match input {
            Some(Key::Quit) => return self.finish(Ending::Quit),
            Some(key) => {
                if let Some(dir) = key.direction() {
                    self.set_direction(dir);
                }
            }
            None => {}
        }

        let new_head = self.snake.next_head(self.direction);

        if !self.grid.in_bounds(new_head) {
            return self.finish(Ending::Wall);
        }
        if self.snake.bites(new_head) {
            return self.finish(Ending::SelfBite);
        }

        let eats = self.food == Some(new_head);
        self.snake.advance(self.direction, eats);

        if eats {
            self.score += 1;
            self.food = place_food(&self.grid, &self.snake, rng);

            match self.food {
                Some(food) => debug!("ate at {:?}, next food at {:?}", new_head, food),
                None => return self.finish(Ending::BoardCleared),
            }
        }

        self.phase
    }

    pub fn snapshot(&self, best_score: u32) -> Snapshot<'_> {
        Snapshot {
            grid: self.grid,
            snake: &self.snake,
            direction: self.direction,
            food: self.food,
            score: self.score,
            best_score,
            phase: self.phase,
        }
    }

    fn finish(&mut self, ending: Ending) -> Phase {
        info!("session over: {:?} with score {}", ending, self.score);
        self.phase = Phase::GameOver(ending);
        self.phase
    }
}
