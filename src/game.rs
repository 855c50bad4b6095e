//! Game engine: the falling piece, gravity, locking, scoring and game over.

use rand::{rngs::StdRng, SeedableRng};

use crate::grid::{Cell, Grid, GRID_HEIGHT, GRID_WIDTH};
use crate::piece::{shape_of, PieceKind, Rotation};

// ============================================================================
// Scoring
// ============================================================================

pub const SCORE_SINGLE: u32 = 40;
pub const SCORE_DOUBLE: u32 = 100;
pub const SCORE_TRIPLE: u32 = 300;
pub const SCORE_TETRIS: u32 = 1200;

/// Pivot column for every freshly spawned piece.
pub const SPAWN_COL: i16 = GRID_WIDTH as i16 / 2 - 1;

pub fn score_for_rows(rows: usize) -> u32 {
    match rows {
        0 => 0,
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        _ => SCORE_TETRIS,
    }
}

// ============================================================================
// Types
// ============================================================================

/// Absolute grid coordinate. Signed because a rotated piece may poke above row 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub row: i16,
    pub col: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub pivot: Position,
    pub rotation: Rotation,
}

impl ActivePiece {
    /// Top-center placement with the highest cell on row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new_at(kind, kind.top_extent(), SPAWN_COL)
    }

    pub fn new_at(kind: PieceKind, row: i16, col: i16) -> Self {
        Self {
            kind,
            pivot: Position { row, col },
            rotation: Rotation::R0,
        }
    }

    pub fn cells(&self) -> [Position; 4] {
        shape_of(self.kind, self.rotation).map(|(dy, dx)| Position {
            row: self.pivot.row + dy,
            col: self.pivot.col + dx,
        })
    }

    fn shifted(&self, drow: i16, dcol: i16) -> Self {
        Self {
            pivot: Position {
                row: self.pivot.row + drow,
                col: self.pivot.col + dcol,
            },
            ..*self
        }
    }

    fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(),
            ..*self
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceSpawned(PieceKind),
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    GameOver,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// The piece moved down one row.
    Fell,
    /// The piece became part of the grid.
    Locked { rows_cleared: usize },
    /// Nothing happened because the game has stopped.
    Halted,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

/// Uniform choice over all five kinds.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::random(&mut self.rng)
    }
}

/// Cycles through a fixed list.
pub struct SequencePieceProvider {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        assert!(!pieces.is_empty(), "sequence provider needs at least one piece");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

pub type BoxedProvider = Box<dyn PieceProvider + Send>;

// ============================================================================
// Game
// ============================================================================

/// The single mutable root of a game. Every mutation of the grid and the falling piece goes
/// through here; once `is_running()` turns false nothing changes any more.
pub struct GameState {
    grid: Grid,
    active: Option<ActivePiece>,
    score: u32,
    combo_count: u32,
    lines_cleared: u32,
    running: bool,
    piece_provider: BoxedProvider,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    /// Empty grid with the first piece already spawned.
    pub fn with_provider(provider: BoxedProvider) -> Self {
        let mut game = Self::stopped(Grid::new(), provider);
        game.running = true;
        game.spawn();
        game
    }

    /// Starts from an arbitrary position. `active` is taken as is, without an overlap check.
    pub fn with_grid_and_provider(grid: Grid, active: ActivePiece, provider: BoxedProvider) -> Self {
        let mut game = Self::stopped(grid, provider);
        game.running = true;
        game.active = Some(active);
        game
    }

    fn stopped(grid: Grid, provider: BoxedProvider) -> Self {
        Self {
            grid,
            active: None,
            score: 0,
            combo_count: 0,
            lines_cleared: 0,
            running: false,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn falling(&self) -> Option<ActivePiece> {
        if self.running {
            self.active
        } else {
            None
        }
    }

    /// Columns must be on the board and rows must be above the floor. Rows above the top count
    /// as free so that a piece can rotate partly off the top edge.
    fn cell_free(&self, cell: Position) -> bool {
        if !(0..GRID_WIDTH as i16).contains(&cell.col) {
            return false;
        }
        if cell.row < 0 {
            return true;
        }
        matches!(self.grid.is_occupied(cell.row, cell.col), Ok(false))
    }

    fn fits(&self, piece: &ActivePiece) -> bool {
        piece.cells().iter().all(|&cell| self.cell_free(cell))
    }

    /// Places a new piece from the provider, or ends the game if its cells are already taken.
    pub fn spawn(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let kind = self.piece_provider.next_piece();
        let piece = ActivePiece::spawn(kind);
        if self.fits(&piece) {
            self.active = Some(piece);
            self.events.push(GameEvent::PieceSpawned(kind));
            true
        } else {
            self.end_game();
            false
        }
    }

    pub fn try_move(&mut self, direction: Direction) -> bool {
        let Some(piece) = self.falling() else {
            return false;
        };
        let moved = piece.shifted(0, direction.delta());
        if !self.fits(&moved) {
            return false;
        }
        self.active = Some(moved);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    /// Clockwise quarter turn around the pivot. No wall kicks: a blocked turn is dropped.
    pub fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.falling() else {
            return false;
        };
        let rotated = piece.rotated();
        if !self.fits(&rotated) {
            return false;
        }
        self.active = Some(rotated);
        self.events.push(GameEvent::PieceRotated);
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(piece) = self.falling() else {
            return TickOutcome::Halted;
        };
        let dropped = piece.shifted(1, 0);
        if self.fits(&dropped) {
            self.active = Some(dropped);
            // a tick that clears nothing breaks the combo
            self.combo_count = 0;
            return TickOutcome::Fell;
        }
        let rows_cleared = self.lock(piece);
        TickOutcome::Locked { rows_cleared }
    }

    /// Ticks until the piece locks. The pivot is one of the piece's cells and never starts above
    /// row 0, so this takes at most `GRID_HEIGHT` ticks.
    pub fn hard_drop(&mut self) -> TickOutcome {
        loop {
            match self.tick() {
                TickOutcome::Fell => continue,
                outcome => return outcome,
            }
        }
    }

    pub fn quit(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.active = None;
        self.events.push(GameEvent::Quit);
    }

    fn lock(&mut self, piece: ActivePiece) -> usize {
        self.active = None;

        // A cell above row 0 has nowhere to go: the stack has topped out.
        let mut locked_out = false;
        for cell in piece.cells() {
            if self.grid.set(cell.row, cell.col, Cell::Filled).is_err() {
                locked_out = true;
            }
        }
        self.events.push(GameEvent::PieceLocked);

        let rows_cleared = self.grid.clear_full_rows();
        self.award(rows_cleared);

        if locked_out {
            self.end_game();
        } else {
            self.spawn();
        }
        rows_cleared
    }

    fn award(&mut self, rows_cleared: usize) {
        if rows_cleared == 0 {
            self.combo_count = 0;
            return;
        }
        self.combo_count = self.combo_count.saturating_add(1);
        self.score = self.score.saturating_add(score_for_rows(rows_cleared));
        self.lines_cleared = self.lines_cleared.saturating_add(rows_cleared as u32);
        self.events.push(GameEvent::LinesCleared(rows_cleared as u32));
    }

    fn end_game(&mut self) {
        self.running = false;
        self.active = None;
        self.events.push(GameEvent::GameOver);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            active: self.active.map(|piece| ActiveView {
                kind: piece.kind,
                cells: piece.cells(),
            }),
            score: self.score,
            combo_count: self.combo_count,
            lines_cleared: self.lines_cleared,
            running: self.running,
        }
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActiveView {
    pub kind: PieceKind,
    pub cells: [Position; 4],
}

/// What a frame shows at one grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameCell {
    Empty,
    Locked,
    Active(PieceKind),
}

/// Read-only copy of everything a renderer needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub grid: Grid,
    pub active: Option<ActiveView>,
    pub score: u32,
    pub combo_count: u32,
    pub lines_cleared: u32,
    pub running: bool,
}

impl Snapshot {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The falling piece wins over whatever is underneath it.
    pub fn cell_at(&self, row: usize, col: usize) -> FrameCell {
        if let Some(active) = &self.active {
            let hit = active
                .cells
                .iter()
                .any(|cell| cell.row == row as i16 && cell.col == col as i16);
            if hit {
                return FrameCell::Active(active.kind);
            }
        }
        match self.grid.get(row as i16, col as i16) {
            Ok(Cell::Filled) => FrameCell::Locked,
            _ => FrameCell::Empty,
        }
    }

    pub fn frame(&self) -> [[FrameCell; GRID_WIDTH]; GRID_HEIGHT] {
        let mut frame = [[FrameCell::Empty; GRID_WIDTH]; GRID_HEIGHT];
        for (row, cells) in frame.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.cell_at(row, col);
            }
        }
        frame
    }
}
