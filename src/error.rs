use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A piece was inserted without the caller first checking `collides`.
    /// Reports the first offending cell.
    #[error("cannot insert piece: cell ({x}, {y}) is blocked or out of bounds")]
    InvalidInsert { x: i16, y: i16 },

    #[error("unrecognized command {0:?}")]
    UnrecognizedCommand(String),
}
