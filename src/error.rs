//! Error types for the rule engine, the turn controller and their collaborators.
//!
//! Every error here leaves the board untouched: a rejected operation never
//! mutates state.

use crate::location::Location;
use crate::piece::Side;
use thiserror::Error;

/// Reasons the move executor refuses to apply a move.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate pair outside the 9x10 board
    #[error("square ({x}, {y}) is outside the board")]
    OutOfRange { x: i64, y: i64 },

    /// Nothing to move
    #[error("no piece at source square {0}")]
    EmptySource(Location),

    /// The destination holds a piece of the mover's own side
    #[error("piece at {from} cannot capture its own side at {to}")]
    FriendlyCapture { from: Location, to: Location },
}

/// Failures while asking a decision service for a move.
#[derive(Error, Debug)]
pub enum DecisionError {
    /// The request never produced a response
    #[error("decision service request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("decision service responded with status {0}")]
    Status(u16),

    /// The response body is not four coordinates
    #[error("malformed decision service response '{body}': {reason}")]
    Malformed { body: String, reason: String },

    #[error("failed to encode decision request: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Setup-time failures. These prevent a game from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid decision service endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("decision service endpoint '{endpoint}' must use http or https")]
    UnsupportedScheme { endpoint: String },

    #[error("route '{route}' must be an absolute path without captures")]
    InvalidRoute { route: String },
}

/// Malformed board descriptions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid piece code {code} at ({x}, {y})")]
    InvalidCode { code: u8, x: usize, y: usize },

    #[error("invalid fen '{0}'")]
    InvalidFen(String),
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("{0} is not controlled by a decision service")]
    NotAutomated(Side),
}
