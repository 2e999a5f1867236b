use std::{io, thread::sleep, time::Instant};

use log::info;
use rand::Rng;

use crate::config::GameConfig;
use crate::game::Game;
use crate::term::{Choice, Terminal};

/// What is left to report once the player stops.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub last_score: u32,
    pub best_score: u32,
    pub sessions: u32,
}

/// Owns everything that outlives a single play-through: the configuration,
/// the random source and the best score of this run.
pub struct Session<R> {
    config: GameConfig,
    rng: R,
    best_score: u32,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Session { config, rng, best_score: 0 }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn new_session(&mut self) -> Game {
        Game::new(&self.config, &mut self.rng)
    }

    /// Folds a finished session's score into the best score.
    pub fn record_score(&mut self, score: u32) -> u32 {
        self.best_score = self.best_score.max(score);
        self.best_score
    }

    /// Ticks `game` until it is over: poll, step, draw, then wait out the rest
    /// of the tick.
    pub fn play<T: Terminal>(&mut self, game: &mut Game, term: &mut T) -> io::Result<()> {
        term.render(&game.snapshot(self.best_score))?;

        while !game.is_over() {
            let started = Instant::now();

            let key = term.poll_input(self.config.tick)?;
            game.tick(key, &mut self.rng);
            term.render(&game.snapshot(self.best_score))?;

            if let Some(rest) = self.config.tick.checked_sub(started.elapsed()) {
                if !rest.is_zero() {
                    sleep(rest);
                }
            }
        }

        Ok(())
    }

    /// Records the score, shows the end screen and asks whether to go again.
    pub fn end_session<T: Terminal>(&mut self, game: &Game, term: &mut T) -> io::Result<bool> {
        self.record_score(game.score());
        term.show_game_over(&game.snapshot(self.best_score))?;

        Ok(term.blocking_read_choice()? == Choice::Restart)
    }

    pub fn run<T: Terminal>(&mut self, term: &mut T) -> io::Result<Summary> {
        let mut sessions = 0;

        loop {
            sessions += 1;
            info!("starting session {}", sessions);

            let mut game = self.new_session();
            self.play(&mut game, term)?;

            if !self.end_session(&game, term)? {
                return Ok(Summary { last_score: game.score(), best_score: self.best_score, sessions });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use crate::game::{Ending, Phase, Snapshot};
    use crate::grid::Point;
    use crate::term::Key;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Plays back canned key presses and remembers what was drawn.
    #[derive(Default)]
    struct ScriptedTerminal {
        keys: VecDeque<Option<Key>>,
        choices: VecDeque<Choice>,
        frames: usize,
        heads: Vec<Point>,
        endings: Vec<(Phase, u32, u32)>,
    }

    impl Terminal for ScriptedTerminal {
        fn poll_input(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
            Ok(self.keys.pop_front().flatten())
        }

        fn blocking_read_choice(&mut self) -> io::Result<Choice> {
            Ok(self.choices.pop_front().unwrap_or(Choice::Quit))
        }

        fn render(&mut self, frame: &Snapshot) -> io::Result<()> {
            self.frames += 1;
            self.heads.push(frame.snake.head());
            Ok(())
        }

        fn show_game_over(&mut self, frame: &Snapshot) -> io::Result<()> {
            self.endings.push((frame.phase, frame.score, frame.best_score));
            Ok(())
        }
    }

    fn session(seed: u64) -> Session<StdRng> {
        let config = GameConfig { width: 10, height: 10, tick: Duration::ZERO, initial_length: 5 };
        Session::new(config, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn quitting_mid_game_still_prompts() {
        let mut session = session(1);
        let mut term = ScriptedTerminal::default();
        term.keys.push_back(Some(Key::Quit));

        let summary = session.run(&mut term).unwrap();

        assert_eq!(summary, Summary { last_score: 0, best_score: 0, sessions: 1 });
        assert_eq!(term.frames, 2);
        assert_eq!(term.endings, vec![(Phase::GameOver(Ending::Quit), 0, 0)]);
    }

    #[test]
    fn restart_runs_another_session() {
        let mut session = session(2);
        let mut term = ScriptedTerminal::default();
        term.keys.push_back(Some(Key::Quit));
        term.choices.push_back(Choice::Restart);
        term.choices.push_back(Choice::Quit);

        let summary = session.run(&mut term).unwrap();

        assert_eq!(summary.sessions, 2);
        assert_eq!(term.endings.len(), 2);

        // The second run goes straight right until it hits the wall
        let (phase, score, best) = term.endings[1];
        assert_eq!(phase, Phase::GameOver(Ending::Wall));
        assert_eq!(summary.last_score, score);
        assert_eq!(summary.best_score, best);
        assert!(best >= score);
    }

    #[test]
    fn every_session_starts_fresh() {
        let mut session = session(3);

        let mut first = session.new_session();
        let mut rng = StdRng::seed_from_u64(0);
        first.tick(Some(Key::Up), &mut rng);
        first.tick(Some(Key::Quit), &mut rng);
        assert!(first.is_over());

        let second = session.new_session();
        assert_eq!(second.score(), 0);
        assert_eq!(second.phase(), Phase::Running);
        assert_eq!(second.snake().head(), Point::new(5, 5));
        assert_eq!(second.snake().len(), 5);
    }

    #[test]
    fn draws_the_start_position_first() {
        let mut session = session(4);
        let mut term = ScriptedTerminal::default();
        term.keys.push_back(None);
        term.keys.push_back(Some(Key::Quit));

        let mut game = session.new_session();
        session.play(&mut game, &mut term).unwrap();

        assert_eq!(term.heads[0], Point::new(5, 5));
        assert_eq!(term.heads[1], Point::new(6, 5));
        assert_eq!(term.frames, 3);
    }

    proptest! {
        #[test]
        fn best_score_never_drops(scores in proptest::collection::vec(0u32..500, 1..30)) {
            let mut session = session(5);
            let mut previous = 0;

            for score in &scores {
                let best = session.record_score(*score);
                prop_assert!(best >= previous);
                prop_assert!(best >= *score);
                previous = best;
            }
            prop_assert_eq!(session.best_score(), *scores.iter().max().unwrap());
        }
    }
}
