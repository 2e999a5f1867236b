use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read, poll};
use log::warn;

use crate::game::{Ending, Phase, Snapshot};
use crate::grid::Point;
use crate::snake::Direction;

/// Terminal columns used by one board cell, so the board looks about square.
const CELL_WIDTH: usize = 2;

const SNAKE_BODY: &str = "██";
const FOOD: &str = "()";
const DEAD_SNAKE: &str = "XX";
const EMPTY: &str = "  ";

/// A key press, as far as the game cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Quit,
    Restart,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn choice(self) -> Option<Choice> {
        match self {
            Key::Restart => Some(Choice::Restart),
            Key::Quit => Some(Choice::Quit),
            _ => None,
        }
    }
}

/// Answer to the "play again?" prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    Restart,
    Quit,
}

/// What the game needs from the screen and keyboard.
pub trait Terminal {
    /// Waits up to `timeout` for a key press.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Key>>;

    /// Blocks until the player picks restart or quit. Other keys are dropped.
    fn blocking_read_choice(&mut self) -> io::Result<Choice>;

    fn render(&mut self, frame: &Snapshot) -> io::Result<()>;

    fn show_game_over(&mut self, frame: &Snapshot) -> io::Result<()>;
}

/// Maps a raw key event to a game key. Releases and repeats are `None`.
pub fn decode_key(ev: &KeyEvent) -> Option<Key> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    let key = match ev.code {
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Key::Up,
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Key::Left,
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Key::Down,
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Key::Right,
        KeyCode::Char('q') | KeyCode::Char('Q') => Key::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Key::Restart,
        _ => Key::Other,
    };
    Some(key)
}

pub fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "/\\",
        Direction::Down => "\\/",
        Direction::Left => "<:",
        Direction::Right => ":>",
    }
}

/// The bordered board as text rows, walls included.
pub fn field_rows(frame: &Snapshot) -> Vec<String> {
    let width = frame.grid.width() as usize;
    let height = frame.grid.height() as usize;
    let mut cells = vec![EMPTY; width * height];
    let index = |p: Point| p.y as usize * width + p.x as usize;

    if let Some(food) = frame.food {
        cells[index(food)] = FOOD;
    }

    let crashed = matches!(frame.phase, Phase::GameOver(Ending::Wall | Ending::SelfBite));
    for (i, pos) in frame.snake.segments().enumerate() {
        cells[index(pos)] = match (crashed, i) {
            (true, _) => DEAD_SNAKE,
            (false, 0) => head_glyph(frame.direction),
            (false, _) => SNAKE_BODY,
        };
    }

    let edge = format!("+{}+", "-".repeat(width * CELL_WIDTH));
    let mut rows = Vec::with_capacity(height + 2);
    rows.push(edge.clone());
    for row in cells.chunks(width) {
        rows.push(format!("|{}|", row.concat()));
    }
    rows.push(edge);
    rows
}

pub fn status_line(frame: &Snapshot) -> String {
    format!("Score: {}  Best: {}  (q to quit)", frame.score, frame.best_score)
}

/// Where the field goes on screen: centered, pushed to (0, 0) when it does
/// not fit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub left: usize,
    pub top: usize,
    pub fits: bool,
}

impl Layout {
    pub fn new(term_size: (u16, u16), field_width: usize, field_height: usize) -> Self {
        let (cols, rows) = (term_size.0 as usize, term_size.1 as usize);
        Layout {
            left: cols.saturating_sub(field_width) / 2,
            top: rows.saturating_sub(field_height) / 2,
            fits: field_width <= cols && field_height <= rows,
        }
    }
}

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    needs_clear: bool,
}

impl TermManager {
    /// Takes over the terminal. It is handed back when the manager is
    /// dropped, on every path out, panics included.
    pub fn acquire() -> io::Result<Self> {
        let mut term = TermManager { width: 0, height: 0, stdout: stdout(), needs_clear: true };
        term.setup()?;
        Ok(term)
    }

    fn setup(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.width = width;
        self.height = height;

        execute!(self.stdout, EnterAlternateScreen)?;
        self.set_raw_mode(true)?;
        self.set_cursor_visibility(false)?;
        self.set_cursor_blink(false)?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        // Keep going after a failure, a half restored terminal is the worst case
        let raw = self.set_raw_mode(false);
        let visible = self.set_cursor_visibility(true);
        let blink = self.set_cursor_blink(true);
        let screen = execute!(self.stdout, LeaveAlternateScreen);
        raw.and(visible).and(blink).and(screen)
    }

    /// Picks up terminal resizes; anything already on screen is stale then.
    fn refresh_size(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.needs_clear = true;
        }
        Ok(())
    }

    fn clear_if_needed(&mut self) -> io::Result<()> {
        if self.needs_clear {
            queue!(self.stdout, terminal::Clear(ClearType::All))?;
            self.needs_clear = false;
        }
        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let msg_height = lines.len() + 2;
        let layout = Layout::new((self.width, self.height), msg_width, msg_height);

        let blank = " ".repeat(msg_width);
        self.print_clipped(layout.left, layout.top, &blank)?;
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width);
            self.print_clipped(layout.left, layout.top + i + 1, &padded_line)?;
        }
        self.print_clipped(layout.left, layout.top + msg_height - 1, &blank)?;

        // The box covers part of the board
        self.needs_clear = true;
        self.flush()
    }

    /// Prints `text` at a screen position, dropping whatever falls outside
    /// the terminal.
    fn print_clipped(&mut self, col: usize, row: usize, text: &str) -> io::Result<()> {
        let (width, height) = (self.width as usize, self.height as usize);
        if row >= height || col >= width {
            return Ok(());
        }

        let visible: String = text.chars().take(width - col).collect();
        queue!(self.stdout, cursor::MoveTo(col as u16, row as u16), style::Print(visible))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn set_raw_mode(&self, option: bool) -> io::Result<()> {
        if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        }
    }

    fn set_cursor_blink(&mut self, option: bool) -> io::Result<()> {
        if option {
            execute!(self.stdout, cursor::EnableBlinking)
        } else {
            execute!(self.stdout, cursor::DisableBlinking)
        }
    }

    fn set_cursor_visibility(&mut self, option: bool) -> io::Result<()> {
        if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        }
    }
}

impl Terminal for TermManager {
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !poll(timeout)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(decode_key(&ev)),
            _ => Ok(None),
        }
    }

    fn blocking_read_choice(&mut self) -> io::Result<Choice> {
        loop {
            if let Event::Key(ev) = read()? {
                if let Some(choice) = decode_key(&ev).and_then(Key::choice) {
                    return Ok(choice);
                }
            }
        }
    }

    fn render(&mut self, frame: &Snapshot) -> io::Result<()> {
        self.refresh_size()?;

        let rows = field_rows(frame);
        let field_width = rows[0].chars().count();
        let layout = Layout::new((self.width, self.height), field_width, rows.len() + 1);

        if self.needs_clear && !layout.fits {
            warn!("terminal {}x{} is too small for the board", self.width, self.height);
        }
        self.clear_if_needed()?;

        for (i, row) in rows.iter().enumerate() {
            self.print_clipped(layout.left, layout.top + i, row)?;
        }

        let status = format!("{:<width$}", status_line(frame), width = field_width);
        self.print_clipped(layout.left, layout.top + rows.len(), &status)?;

        self.flush()
    }

    fn show_game_over(&mut self, frame: &Snapshot) -> io::Result<()> {
        let headline = match frame.phase {
            Phase::GameOver(Ending::BoardCleared) => "You won!",
            Phase::GameOver(Ending::Quit) => "Quit.",
            _ => "Game over!",
        };
        let score = format!("Score: {}", frame.score);
        let best = format!("Best: {}", frame.best_score);

        self.show_message(&[
            headline,
            &score,
            &best,
            "",
            "Press r to play again,",
            "or q to quit.",
        ])
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("could not restore the terminal: {}", err);
        }
    }
}
