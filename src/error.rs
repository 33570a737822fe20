use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Street {0} is not a betting street")]
    NotABettingStreet(u8),

    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),

    #[error("Cannot pack more than {max} {what}")]
    PackingOverflow { what: &'static str, max: usize },

    #[error("Raise increment {increment} does not match any pot fraction of pot {pot}")]
    AbstractionMismatch { increment: i32, pot: i32 },

    #[error("Arithmetic precondition failed: {0}")]
    ArithmeticPrecondition(String),

    #[error("Cannot assign rewards from non-terminal street {0}")]
    NotTerminal(u8),

    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;
