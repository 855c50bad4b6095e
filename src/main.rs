use std::io::{stdout, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;

use termtris::{
    config::Config,
    game::GameState,
    runtime::{self, CrosstermInput},
    ui::TerminalRenderer,
};

fn main() -> Result<()> {
    // The alternate screen owns the TTY, so logging stays off unless RUST_LOG asks for it
    // (and stderr is redirected somewhere useful).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let config = Config::from_env().context("invalid timing configuration")?;
    info!("starting with {config:?}");

    let mut game = GameState::new();

    enable_raw_mode().context("failed to enable raw mode")?;
    let result = run(&mut game, &config);

    // Always try to restore terminal state.
    if let Err(err) = stdout().execute(LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {err}");
    }
    if let Err(err) = disable_raw_mode() {
        warn!("failed to disable raw mode: {err}");
    }

    result?;
    println!("Final score: {}", game.score());
    Ok(())
}

fn run(game: &mut GameState, config: &Config) -> Result<()> {
    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let mut renderer: TerminalRenderer<CrosstermBackend<Stdout>> =
        TerminalRenderer::new(CrosstermBackend::new(stdout()))
            .context("failed to set up terminal")?;

    runtime::play(game, CrosstermInput, &mut renderer, config)
        .context("failed to start input listener")?;
    Ok(())
}
