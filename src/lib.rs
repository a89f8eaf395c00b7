//! Falling-block game engine. The library owns all game rules and never
//! performs I/O; the binary in `main.rs` is thin terminal glue on top.

pub mod app;
pub mod board;
pub mod config;
pub mod coord;
pub mod error;
pub mod factory;
pub mod piece;
pub mod session;

pub use app::{App, AppCommand, AppState, SessionOutcome};
pub use board::{Board, Cell, HEIGHT, WIDTH};
pub use config::{score_for_rows, Tuning, MAX_LEVEL};
pub use coord::Coord;
pub use error::EngineError;
pub use factory::{spawn, PieceSource, RandomSource, SequenceSource, SPAWN_ANCHOR};
pub use piece::{Piece, PieceKind};
pub use session::{Command, GameSession, Phase, StepSummary};
