//! The game session: owns the board and pieces and applies ticks and player
//! commands one at a time.

use log::{debug, info};

use super::board::{Board, Cell};
use super::config::{Config, ConfigError};
use super::piece::{is_legal, FallingPiece};
use super::pieces::{PieceKind, PieceProvider, RandomPieceProvider};

// ============================================================================
// Speed
// ============================================================================

/// Fall delay bonus mode starts counting down from.
pub const BONUS_BASE_DELAY: u32 = 10;
/// Fastest fall delay bonus mode reaches.
pub const MIN_FALL_DELAY: u32 = 2;
/// Score needed for each one-tick speed step in bonus mode.
pub const SCORE_PER_SPEED_STEP: u32 = 10;

/// Fall delay bonus mode uses at `score`.
pub fn bonus_fall_delay(score: u32) -> u32 {
    BONUS_BASE_DELAY
        .saturating_sub(score / SCORE_PER_SPEED_STEP)
        .max(MIN_FALL_DELAY)
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    SpeedChanged(u32),
    BonusModeActivated,
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

/// Everything the input shell can ask of a session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
    ActivateBonusMode,
    Restart,
    Tick,
}

// ============================================================================
// Session
// ============================================================================

pub struct Session {
    config: Config,
    board: Board,
    current_piece: FallingPiece,
    next_piece: Option<PieceKind>,
    score: u32,
    paused: bool,
    game_over: bool,
    bonus_mode: bool,
    fall_delay: u32,
    fall_counter: u64,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Starts a game with random pieces, seeded from `config.seed` if set.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let provider = match config.seed {
            Some(seed) => RandomPieceProvider::seeded(seed),
            None => RandomPieceProvider::new(),
        };
        Self::with_provider(config, Box::new(provider))
    }

    pub fn with_provider(
        config: Config,
        mut provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = Board::new(config.rows, config.cols);
        let first = provider.next_piece();
        let (current_piece, legal) = FallingPiece::try_spawn(first, &board);

        let mut session = Self {
            config,
            board,
            current_piece,
            next_piece: None,
            score: 0,
            paused: false,
            game_over: false,
            bonus_mode: false,
            fall_delay: config.fall_delay,
            fall_counter: 0,
            piece_provider: provider,
            events: Vec::new(),
        };
        if !legal {
            session.end_game();
        }
        Ok(session)
    }

    /// Resumes from an arbitrary board and piece, for scripted scenarios.
    /// Later pieces come from `provider`.
    pub fn with_board(
        board: Board,
        current_piece: FallingPiece,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        let legal = is_legal(&board, &current_piece);
        let config = Config {
            rows: board.rows(),
            cols: board.cols(),
            ..Config::default()
        };

        let mut session = Self {
            config,
            board,
            current_piece,
            next_piece: None,
            score: 0,
            paused: false,
            game_over: false,
            bonus_mode: false,
            fall_delay: config.fall_delay,
            fall_counter: 0,
            piece_provider: provider,
            events: Vec::new(),
        };
        if !legal {
            session.end_game();
        }
        session
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &FallingPiece {
        &self.current_piece
    }

    /// Preview piece; only present in bonus mode.
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn bonus_mode(&self) -> bool {
        self.bonus_mode
    }

    pub fn fall_delay(&self) -> u32 {
        self.fall_delay
    }

    pub fn fall_counter(&self) -> u64 {
        self.fall_counter
    }

    /// Game over wins over paused.
    pub fn state(&self) -> GameState {
        if self.game_over {
            GameState::GameOver
        } else if self.paused {
            GameState::Paused
        } else {
            GameState::Playing
        }
    }

    fn is_playing(&self) -> bool {
        self.state() == GameState::Playing
    }

    /// Returns the board with the falling piece drawn in, unless the game is over.
    pub fn render_grid(&self) -> Vec<Vec<Cell>> {
        let mut visual_grid: Vec<Vec<Cell>> =
            self.board.iter_rows().map(<[Cell]>::to_vec).collect();

        if !self.game_over {
            let color = self.current_piece.color;
            for (row, col) in self.current_piece.board_cells() {
                if let Some(cell) = visual_grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = Cell::Locked(color);
                }
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events. Events pile up until this is
    /// called, so callers drain it once per frame.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => {
                self.move_left();
            }
            Command::MoveRight => {
                self.move_right();
            }
            Command::SoftDrop => {
                self.soft_drop();
            }
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => {
                self.rotate();
            }
            Command::TogglePause => self.toggle_pause(),
            Command::ActivateBonusMode => self.activate_bonus_mode(),
            Command::Restart => self.restart(),
            Command::Tick => self.tick(),
        }
    }

    /// Advances gravity by one tick. Only counts while playing.
    pub fn tick(&mut self) {
        if !self.is_playing() {
            return;
        }

        self.fall_counter += 1;
        if self.fall_counter % u64::from(self.fall_delay) == 0
            && !self.current_piece.try_move(&self.board, 1, 0)
        {
            self.lock_and_spawn();
        }
    }

    pub fn move_piece(&mut self, drow: i32, dcol: i32) -> bool {
        if !self.is_playing() {
            return false;
        }
        let moved = self.current_piece.try_move(&self.board, drow, dcol);
        if moved {
            self.events.push(GameEvent::PieceMoved);
        }
        moved
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(0, -1)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// One row down. Never locks; gravity or a hard drop does that.
    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(1, 0)
    }

    pub fn rotate(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let rotated = self.current_piece.rotate(&self.board);
        if rotated {
            self.events.push(GameEvent::PieceRotated);
        }
        rotated
    }

    pub fn hard_drop(&mut self) {
        if !self.is_playing() {
            return;
        }
        let mut dropped = 0;
        while self.current_piece.try_move(&self.board, 1, 0) {
            dropped += 1;
        }
        debug!("hard drop of {:?} fell {} rows", self.current_piece.kind, dropped);
        self.lock_and_spawn();
    }

    /// Flips the pause flag in any state; while game over it has no visible effect.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.game_over {
            return;
        }
        self.events.push(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Unpaused
        });
    }

    /// Turns on the preview piece and score-based speed. Firing again only
    /// redraws the preview.
    pub fn activate_bonus_mode(&mut self) {
        if self.game_over {
            return;
        }
        self.bonus_mode = true;
        let next = self.piece_provider.next_piece();
        self.next_piece = Some(next);
        info!(
            "bonus mode activated: next piece preview and increasing speed (next {:?})",
            next
        );
        self.events.push(GameEvent::BonusModeActivated);
    }

    /// Throws the current game away and starts over with the same configuration.
    pub fn restart(&mut self) {
        self.board = Board::new(self.config.rows, self.config.cols);
        self.next_piece = None;
        self.score = 0;
        self.paused = false;
        self.game_over = false;
        self.bonus_mode = false;
        self.fall_delay = self.config.fall_delay;
        self.fall_counter = 0;
        self.events.clear();

        info!("game restarted");
        self.events.push(GameEvent::GameRestarted);

        self.spawn_next_piece();
    }

    // ------------------------------------------------------------------------
    // Locking and spawning
    // ------------------------------------------------------------------------

    /// Shared by gravity and hard drop.
    fn lock_and_spawn(&mut self) {
        let color = self.current_piece.color;
        self.board.lock(self.current_piece.board_cells(), color);
        debug!(
            "locked {:?} at {:?}",
            self.current_piece.kind, self.current_piece.position
        );
        self.events.push(GameEvent::PieceLocked);

        let cleared = self.board.clear_full_rows() as u32;
        if cleared > 0 {
            debug!("cleared {} rows", cleared);
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        self.score += cleared;

        if self.bonus_mode {
            let delay = bonus_fall_delay(self.score);
            if delay != self.fall_delay {
                debug!("fall delay {} -> {}", self.fall_delay, delay);
                self.fall_delay = delay;
                self.events.push(GameEvent::SpeedChanged(delay));
            }
        }

        self.spawn_next_piece();
    }

    fn spawn_next_piece(&mut self) {
        let kind = match self.next_piece.take() {
            Some(next) if self.bonus_mode => next,
            _ => self.piece_provider.next_piece(),
        };
        if self.bonus_mode {
            self.next_piece = Some(self.piece_provider.next_piece());
        }

        let (piece, legal) = FallingPiece::try_spawn(kind, &self.board);
        self.current_piece = piece;
        if !legal {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.game_over = true;
        info!("game over with score {}", self.score);
        self.events.push(GameEvent::GameOver);
    }
}
