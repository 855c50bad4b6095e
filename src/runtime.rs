//! Threads and timing around the engine.
//!
//! The engine loop owns the [`GameState`]; nothing else touches it. An input listener thread decodes
//! key presses and sends [`Command`]s over a channel, and gravity fires whenever the loop's deadline
//! passes while it waits on that channel. Each command or tick therefore runs to completion before the
//! next one is looked at, and snapshots for the renderer are taken on the same thread.

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};
use log::{debug, info, warn};

use crate::command::{is_interrupt, Command};
use crate::config::Config;
use crate::game::{GameEvent, GameState, Snapshot, TickOutcome};

// ============================================================================
// Stop Signal
// ============================================================================

/// Shared shutdown flag. Once set it stays set.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Collaborators
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Command(Command),
    /// Timed out, or received something that maps to no command.
    Idle,
    /// The source has nothing more to give.
    Closed,
}

pub trait InputSource {
    /// Waits at most `timeout` for the next input.
    fn next_input(&mut self, timeout: Duration) -> io::Result<Input>;
}

pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}

/// Keyboard input from the terminal. Expects raw mode to be enabled by the caller.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn next_input(&mut self, timeout: Duration) -> io::Result<Input> {
        if !event::poll(timeout)? {
            return Ok(Input::Idle);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(Input::Idle);
        };
        if is_interrupt(key) {
            return Ok(Input::Command(Command::Quit));
        }
        Ok(Command::from_key_event(key).map_or(Input::Idle, Input::Command))
    }
}

// ============================================================================
// Input Listener
// ============================================================================

pub fn spawn_input_listener<S>(
    source: S,
    commands: Sender<Command>,
    stop: StopSignal,
    poll: Duration,
) -> io::Result<JoinHandle<()>>
where
    S: InputSource + Send + 'static,
{
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || listen(source, commands, stop, poll))
}

fn listen<S: InputSource>(mut source: S, commands: Sender<Command>, stop: StopSignal, poll: Duration) {
    while !stop.is_stopped() {
        match source.next_input(poll) {
            Ok(Input::Command(command)) => {
                debug!("input: {command:?}");
                if commands.send(command).is_err() {
                    break;
                }
            }
            Ok(Input::Idle) => {}
            Ok(Input::Closed) => {
                info!("input source closed");
                break;
            }
            Err(err) => {
                warn!("reading input failed: {err}");
                break;
            }
        }
    }
    debug!("input listener exiting");
}

// ============================================================================
// Engine Loop
// ============================================================================

/// Runs until the game stops, then raises `stop` so the listener winds down too.
///
/// A closed command channel ends the game the same way a quit does.
pub fn run_game<R: Renderer + ?Sized>(
    game: &mut GameState,
    commands: &Receiver<Command>,
    renderer: &mut R,
    config: &Config,
    stop: &StopSignal,
) {
    log_events(game);
    draw(game, renderer);

    let mut next_tick = Instant::now() + config.gravity;
    while game.is_running() {
        if stop.is_stopped() {
            game.quit();
            log_events(game);
            break;
        }

        let wait = next_tick.saturating_duration_since(Instant::now());
        let changed = match commands.recv_timeout(wait) {
            Ok(command) => game.apply(command),
            Err(RecvTimeoutError::Timeout) => {
                next_tick = (next_tick + config.gravity).max(Instant::now());
                game.tick() != TickOutcome::Halted
            }
            Err(RecvTimeoutError::Disconnected) => {
                info!("command channel closed, ending game");
                game.quit();
                true
            }
        };

        log_events(game);
        if changed {
            draw(game, renderer);
        }
    }

    stop.stop();
    info!(
        "game stopped: score {} lines {}",
        game.score(),
        game.lines_cleared()
    );
}

fn draw<R: Renderer + ?Sized>(game: &GameState, renderer: &mut R) {
    if let Err(err) = renderer.draw(&game.snapshot()) {
        warn!("render failed: {err}");
    }
}

fn log_events(game: &mut GameState) {
    for event in game.take_events() {
        match event {
            GameEvent::PieceSpawned(kind) => info!("spawned {kind:?}"),
            GameEvent::LinesCleared(rows) => {
                debug!("cleared {rows} rows, combo {}", game.combo_count())
            }
            GameEvent::GameOver => info!("game over"),
            GameEvent::Quit => info!("quit requested"),
            event => debug!("{event:?}"),
        }
    }
}

/// Plays one full game: spawns the listener, runs the engine loop, then joins the listener.
pub fn play<S, R>(
    game: &mut GameState,
    source: S,
    renderer: &mut R,
    config: &Config,
) -> io::Result<()>
where
    S: InputSource + Send + 'static,
    R: Renderer + ?Sized,
{
    let (commands_tx, commands_rx) = mpsc::channel();
    let stop = StopSignal::new();
    let listener = spawn_input_listener(source, commands_tx, stop.clone(), config.poll)?;

    run_game(game, &commands_rx, renderer, config, &stop);

    if listener.join().is_err() {
        warn!("input listener panicked");
    }
    Ok(())
}
