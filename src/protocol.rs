//! Wire format spoken with decision services.
//!
//! A request carries the full grid of piece codes and the side to move:
//! `{"chessboard": [[1, 2, ...], ...], "round": "red"}`. The reply is a bare array
//! `[from_x, from_y, to_x, to_y]`.

use crate::board::{Board, Grid};
use crate::error::{DecisionError, MoveError};
use crate::location::Move;
use crate::piece::Side;
use serde::{Deserialize, Serialize};
use std::future::Future;
use url::Url;

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub chessboard: Grid,
    pub round: Side,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct DecisionReply(pub [i64; 4]);

/// Transport to an automated player. Implementations own timeouts and retries of
/// the underlying connection; they only hand back the raw response body.
pub trait DecisionService {
    fn post(&self, endpoint: &Url, body: String) -> impl Future<Output = Result<String, DecisionError>>;
}

impl DecisionRequest {
    pub fn new(board: &Board, round: Side) -> Self {
        Self {
            chessboard: board.codes(),
            round,
        }
    }

    pub fn encode(&self) -> Result<String, DecisionError> {
        serde_json::to_string(self).map_err(DecisionError::Encoding)
    }

    pub fn decode(body: &str) -> Result<Self, DecisionError> {
        serde_json::from_str(body).map_err(|err| malformed(body, err))
    }
}

impl DecisionReply {
    pub fn encode(&self) -> Result<String, DecisionError> {
        serde_json::to_string(self).map_err(DecisionError::Encoding)
    }

    pub fn decode(body: &str) -> Result<Self, DecisionError> {
        serde_json::from_str(body).map_err(|err| malformed(body, err))
    }

    /// The move the service asked for. Coordinates are only checked against the
    /// board bounds; the move itself is trusted.
    pub fn to_move(&self) -> Result<Move, MoveError> {
        Move::from_coordinates(self.0)
    }
}

impl From<Move> for DecisionReply {
    fn from(mv: Move) -> Self {
        Self(mv.coordinates())
    }
}

fn malformed(body: &str, err: serde_json::Error) -> DecisionError {
    DecisionError::Malformed {
        body: body.trim().to_owned(),
        reason: err.to_string(),
    }
}
