//! One game session: the per-tick state machine that owns the board, the
//! falling piece, and the score/level progression.

use crate::board::Board;
use crate::config::{score_for_rows, Tuning, MAX_LEVEL};
use crate::error::EngineError;
use crate::factory::{spawn, PieceSource};
use crate::piece::Piece;

// ============================================================================
// Commands
// ============================================================================

/// The closed set of per-tick inputs. Exactly one arrives per step; an idle
/// tick is `None`, and gravity rides on the idle ticks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    None,
    Left,
    Right,
    RotateCw,
    RotateCcw,
    SoftDrop,
    Quit,
}

impl Command {
    /// Parse an external command name. Anything outside the closed set is
    /// an error, never silently an idle tick.
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Command::None),
            "left" => Ok(Command::Left),
            "right" => Ok(Command::Right),
            "rotatecw" => Ok(Command::RotateCw),
            "rotateccw" => Ok(Command::RotateCcw),
            "softdrop" => Ok(Command::SoftDrop),
            "quit" => Ok(Command::Quit),
            _ => Err(EngineError::UnrecognizedCommand(s.to_string())),
        }
    }
}

// ============================================================================
// Session state
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Won,
    Lost,
}

/// What one step changed. The caller turns this into redraw decisions;
/// the session itself never draws or plays sounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StepSummary {
    pub active_moved: bool,
    pub board_changed: bool,
    pub locked: bool,
    pub rows_cleared: u32,
    pub score_delta: u32,
    pub level_delta: u32,
    pub quit: bool,
    pub phase: Phase,
}

impl StepSummary {
    fn idle(phase: Phase) -> Self {
        Self {
            active_moved: false,
            board_changed: false,
            locked: false,
            rows_cleared: 0,
            score_delta: 0,
            level_delta: 0,
            quit: false,
            phase,
        }
    }

    pub fn redraw_needed(&self) -> bool {
        self.active_moved || self.board_changed
    }
}

pub struct GameSession {
    board: Board,
    active: Piece,
    next: Piece,
    score: u32,
    level: u32,
    frames_since_fall: u32,
    phase: Phase,
    tuning: Tuning,
    source: Box<dyn PieceSource>,
}

impl GameSession {
    pub fn new(tuning: Tuning, mut source: Box<dyn PieceSource>) -> Self {
        let active = spawn(source.next_kind());
        let next = spawn(source.next_kind());
        Self {
            board: Board::new(),
            active,
            next,
            score: 0,
            level: 1,
            frames_since_fall: 0,
            phase: Phase::Running,
            tuning,
            source,
        }
    }

    /// Start from a prepared board and active piece. For tests that need a
    /// specific stack already on the grid.
    pub fn with_board(
        board: Board,
        active: Piece,
        tuning: Tuning,
        mut source: Box<dyn PieceSource>,
    ) -> Self {
        let next = spawn(source.next_kind());
        Self {
            board,
            active,
            next,
            score: 0,
            level: 1,
            frames_since_fall: 0,
            phase: Phase::Running,
            tuning,
            source,
        }
    }

    // ------------------------------------------------------------------
    // Read-only views for the caller
    // ------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    // ------------------------------------------------------------------
    // The per-tick step
    // ------------------------------------------------------------------

    /// Advance the session by one tick. Finished sessions ignore every
    /// command; `Quit` is reported in the summary and leaves the phase
    /// alone, since abandoning a game is not winning or losing it.
    pub fn step(&mut self, command: Command) -> Result<StepSummary, EngineError> {
        let mut summary = StepSummary::idle(self.phase);
        if self.phase != Phase::Running {
            return Ok(summary);
        }

        // The win lands on the tick after the level-up, before any further
        // command is looked at.
        if self.level >= MAX_LEVEL {
            self.phase = Phase::Won;
            summary.phase = self.phase;
            return Ok(summary);
        }

        if command == Command::Quit {
            summary.quit = true;
            return Ok(summary);
        }

        let command = self.apply_gravity(command);
        if command == Command::None {
            return Ok(summary);
        }

        let snapshot = self.active;
        match command {
            Command::Left => self.active.translate(-1, 0),
            Command::Right => self.active.translate(1, 0),
            Command::SoftDrop => self.active.translate(0, 1),
            Command::RotateCw => self.active.rotate_cw(),
            Command::RotateCcw => self.active.rotate_ccw(),
            Command::None | Command::Quit => unreachable!(),
        }

        if self.board.collides(&self.active) {
            // Rejected moves roll back wholesale. There is no wall-kick
            // nudging; a rotation that does not fit simply does not happen.
            self.active = snapshot;
            if command == Command::SoftDrop {
                self.lock_active(&mut summary)?;
            }
        } else {
            summary.active_moved = true;
        }

        summary.phase = self.phase;
        Ok(summary)
    }

    /// Idle ticks accumulate toward an automatic fall; any real command
    /// resets the countdown.
    fn apply_gravity(&mut self, command: Command) -> Command {
        if command == Command::None {
            self.frames_since_fall += 1;
            if self.frames_since_fall > self.tuning.fall_delay_for(self.level) {
                self.frames_since_fall = 0;
                return Command::SoftDrop;
            }
            Command::None
        } else {
            self.frames_since_fall = 0;
            command
        }
    }

    /// The piece could not move down: write it into the board, clear and
    /// score rows, advance the level, and bring in the next piece. A spawn
    /// that immediately collides loses the session.
    fn lock_active(&mut self, summary: &mut StepSummary) -> Result<(), EngineError> {
        self.board.insert(&self.active)?;
        let rows_cleared = self.board.clear_full_rows();
        let points = score_for_rows(rows_cleared);
        self.score += points;

        let level_before = self.level;
        while self.level < MAX_LEVEL && self.score >= self.tuning.goal_for(self.level) {
            self.level += 1;
        }

        summary.board_changed = true;
        summary.locked = true;
        summary.rows_cleared = rows_cleared;
        summary.score_delta = points;
        summary.level_delta = self.level - level_before;

        self.active = spawn(self.next.kind);
        self.next = spawn(self.source.next_kind());
        if self.board.collides(&self.active) {
            self.phase = Phase::Lost;
        }
        Ok(())
    }
}
