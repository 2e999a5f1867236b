//! Hard-coded game configuration.
//!
//! There are no config files or flags: the defaults below are the game.

use std::time::Duration;

use anyhow::{ensure, Result};

/// Playable columns on the board
pub const BOARD_WIDTH: i32 = 30;

/// Playable rows on the board
pub const BOARD_HEIGHT: i32 = 20;

/// Time between two game steps
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Length of the snake at the start of every session
pub const INITIAL_SNAKE_LENGTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub tick: Duration,
    pub initial_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tick: TICK_INTERVAL,
            initial_length: INITIAL_SNAKE_LENGTH,
        }
    }
}

impl GameConfig {
    /// Checks that a session can actually be set up with these values.
    ///
    /// The snake spawns with its head in the middle of the board and its body
    /// stretched out to the left, so the row must be long enough for it.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "board must be at least 1x1, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.initial_length >= 1, "the snake needs at least one segment");

        let room_left_of_head = (self.width / 2 + 1) as usize;
        ensure!(
            self.initial_length <= room_left_of_head,
            "a snake of length {} does not fit on a board {} cells wide",
            self.initial_length,
            self.width
        );

        let cells = self.width as usize * self.height as usize;
        ensure!(
            self.initial_length < cells,
            "no room left for food on a {}x{} board",
            self.width,
            self.height
        );

        Ok(())
    }
}
