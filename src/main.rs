mod config;
mod food;
mod game;
mod grid;
mod session;
mod snake;
mod term;

use anyhow::{Context, Result};
use env_logger::Env;

use crate::config::GameConfig;
use crate::session::Session;
use crate::term::TermManager;

fn main() -> Result<()> {
    // The game owns the screen, so logs stay off unless RUST_LOG asks for them
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let config = GameConfig::default();
    config.validate().context("invalid board configuration")?;

    let summary = {
        let mut term = TermManager::acquire().context("failed to take control of the terminal")?;
        let mut session = Session::new(config, rand::thread_rng());
        session.run(&mut term).context("terminal error during play")?
        // The terminal is handed back here, before anything is printed
    };

    log::info!("played {} session(s)", summary.sessions);
    println!("Final score: {}", summary.last_score);
    println!("Best score: {}", summary.best_score);
    Ok(())
}
