use thiserror::Error;

// Failures at the input boundary. The engine itself never errors: every move
// it applies has already been matched against its own legal list.
#[derive(Debug, Error, PartialEq)]
pub enum ChessError {
    #[error("'{0}' is not a square between a1 and h8")]
    InvalidSquare(String),

    #[error("no piece to move on {0}")]
    EmptySquare(String),

    #[error("'{0}' is not a legal move here")]
    IllegalMove(String),
}
