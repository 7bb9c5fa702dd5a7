use crate::board::Board;
use crate::error::MoveError;
use crate::location::{Location, Move};
use crate::piece::{Piece, Side};
use log::trace;

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed {
        source: Location,
        destinations: Vec<Location>,
    },
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SelectOutcome {
    /// Nothing changed: an empty square, a miss-click, or an event that was not ours.
    Ignored,
    Armed {
        source: Location,
        destinations: Vec<Location>,
    },
    Committed {
        mv: Move,
        captured: Option<Piece>,
    },
}

/// Two-click protocol: the first click arms a piece, a click on one of its
/// destinations commits the move.
#[derive(Clone, Debug, Default)]
pub struct SelectionSession {
    state: Selection,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Selection::Idle;
    }

    /// Feeds one click into the session.
    ///
    /// With `owner` set, only pieces of that side can be armed; clicks on other pieces
    /// that are not destinations are ignored. With `owner` unset any piece can be armed.
    pub fn select(&mut self, board: &mut Board, location: Location, owner: Option<Side>) -> Result<SelectOutcome, MoveError> {
        if let Selection::Armed { source, destinations } = &self.state
            && destinations.contains(&location)
        {
            let mv = Move::new(*source, location);
            let captured = board.play(mv)?;
            self.state = Selection::Idle;
            return Ok(SelectOutcome::Committed { mv, captured });
        }

        let Some(piece) = board[location] else {
            return Ok(SelectOutcome::Ignored);
        };

        if owner.is_some_and(|owner| owner != piece.side()) {
            return Ok(SelectOutcome::Ignored);
        }

        let destinations = board.destinations(location);
        board.select(location);
        trace!("armed {piece} at {location} with {} destinations", destinations.len());

        self.state = Selection::Armed {
            source: location,
            destinations: destinations.clone(),
        };
        Ok(SelectOutcome::Armed {
            source: location,
            destinations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i8, y: i8) -> Location {
        Location::from_xy(x, y).unwrap()
    }

    #[test]
    fn empty_square_while_idle_is_ignored() {
        let mut board = Board::opening(true);
        let mut session = SelectionSession::new();

        assert_eq!(session.select(&mut board, at(4, 4), None), Ok(SelectOutcome::Ignored));
        assert_eq!(session.state(), &Selection::Idle);
        assert_eq!(board.last_move(), None);
    }

    #[test]
    fn arm_then_commit() {
        let mut board = Board::opening(true);
        let mut session = SelectionSession::new();

        let outcome = session.select(&mut board, at(0, 9), None).unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Armed {
                source: at(0, 9),
                destinations: vec![at(0, 8), at(0, 7)],
            }
        );
        assert!(board.last_move().unwrap().is_selection());

        let outcome = session.select(&mut board, at(0, 7), None).unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Committed {
                mv: Move::new(at(0, 9), at(0, 7)),
                captured: None,
            }
        );
        assert_eq!(session.state(), &Selection::Idle);
        assert_eq!(board.piece_at(at(0, 7)).map(|piece| piece.code()), Some(1));
        assert_eq!(board.piece_at(at(0, 9)), None);
    }

    #[test]
    fn miss_click_keeps_selection() {
        let mut board = Board::opening(true);
        let mut session = SelectionSession::new();

        session.select(&mut board, at(0, 9), None).unwrap();
        let armed = session.state().clone();

        assert_eq!(session.select(&mut board, at(4, 4), None), Ok(SelectOutcome::Ignored));
        assert_eq!(session.state(), &armed);
        assert_eq!(board, {
            let mut expected = Board::opening(true);
            expected.select(at(0, 9));
            expected
        });
    }

    #[test]
    fn clicking_another_piece_rearms() {
        let mut board = Board::opening(true);
        let mut session = SelectionSession::new();

        session.select(&mut board, at(0, 9), None).unwrap();
        let outcome = session.select(&mut board, at(4, 6), None).unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Armed {
                source: at(4, 6),
                destinations: vec![at(4, 5)],
            }
        );
        assert_eq!(board.last_move().unwrap().from, at(4, 6));

        // ungated sessions may arm the other side's pieces too
        let outcome = session.select(&mut board, at(4, 3), None).unwrap();
        assert!(matches!(outcome, SelectOutcome::Armed { source, .. } if source == at(4, 3)));
    }

    #[test]
    fn capture_takes_priority_over_rearming() {
        // red chariot facing a blue chariot on an open file
        let mut board = Board::from_fen("r8/9/9/9/9/9/9/9/9/R8", true).unwrap();
        let mut session = SelectionSession::new();

        session.select(&mut board, at(0, 9), Some(Side::Red)).unwrap();
        let outcome = session.select(&mut board, at(0, 0), Some(Side::Red)).unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Committed {
                mv: Move::new(at(0, 9), at(0, 0)),
                captured: Piece::from_code(11),
            }
        );
        assert_eq!(board.iter().count(), 1);
    }

    #[test]
    fn owner_gates_arming() {
        let mut board = Board::opening(true);
        let mut session = SelectionSession::new();

        assert_eq!(session.select(&mut board, at(4, 3), Some(Side::Red)), Ok(SelectOutcome::Ignored));
        assert_eq!(session.state(), &Selection::Idle);

        session.select(&mut board, at(4, 6), Some(Side::Red)).unwrap();
        let armed = session.state().clone();
        assert_eq!(session.select(&mut board, at(4, 0), Some(Side::Red)), Ok(SelectOutcome::Ignored));
        assert_eq!(session.state(), &armed);
    }
}
