use crate::board::{Board, LastMove};
use crate::config::{Controller, GameConfig};
use crate::display_format::DisplayFormat;
use crate::error::{DecisionError, GameError};
use crate::location::{Location, Move};
use crate::piece::Side;
use crate::protocol::{DecisionReply, DecisionRequest, DecisionService};
use crate::selection::{SelectOutcome, Selection, SelectionSession};
use log::{debug, trace, warn};
use smol::channel::{self, Receiver, Sender};
use std::fmt::{Display, Formatter};

/// Notifications for whoever presents the game.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum GameEvent {
    Selected {
        source: Location,
        destinations: Vec<Location>,
    },
    Played {
        side: Side,
        record: LastMove,
    },
    Turn(Side),
}

/// Owns the board for the whole game and alternates the side to move.
///
/// Human sides feed clicks through [`Game::select`]; automated sides are asked for
/// their move with [`Game::advance`]. Both borrow the game mutably, so there is never
/// more than one outstanding decision request and no click can slip in while one is
/// awaited.
pub struct Game {
    board: Board,
    turn: Side,
    config: GameConfig,
    session: SelectionSession,
    observers: Vec<Sender<GameEvent>>,
    plies: u32,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(Board::opening(config.red_bottom), config)
    }

    /// Starts from an arbitrary position. The orientation in `config` overrides the board's.
    pub fn with_board(board: Board, config: GameConfig) -> Self {
        if board.red_bottom() != config.red_bottom {
            debug!("reading board with red_bottom = {}", config.red_bottom);
        }

        Self {
            board: board.with_red_bottom(config.red_bottom),
            turn: config.first,
            config,
            session: SelectionSession::new(),
            observers: Vec::new(),
            plies: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    pub fn selection(&self) -> &Selection {
        self.session.state()
    }

    pub fn controller(&self, side: Side) -> &Controller {
        self.config.controller(side)
    }

    pub fn awaiting_human(&self) -> bool {
        self.controller(self.turn).is_human()
    }

    /// Registers an observer. Dropping the receiver unregisters it.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (sender, receiver) = channel::unbounded();
        self.observers.push(sender);
        receiver
    }

    fn notify(&mut self, event: GameEvent) {
        self.observers.retain(|observer| observer.try_send(event.clone()).is_ok());
    }

    /// Squares the piece on `location` could move to, for move hints.
    pub fn destinations(&self, location: Location) -> Vec<Location> {
        self.board.destinations(location)
    }

    /// The request an automated side would receive right now.
    pub fn request(&self) -> DecisionRequest {
        DecisionRequest::new(&self.board, self.turn)
    }

    /// A click from the presentation layer. Clicks off the board are ignored.
    pub fn select_xy(&mut self, x: i64, y: i64) -> Result<SelectOutcome, GameError> {
        match Location::from_wide(x, y) {
            Some(location) => self.select(location),
            None => Ok(SelectOutcome::Ignored),
        }
    }

    /// A click on `location`, honoured only while a human side is to move and only
    /// for arming that side's own pieces.
    pub fn select(&mut self, location: Location) -> Result<SelectOutcome, GameError> {
        if !self.awaiting_human() {
            trace!("ignored click on {location} while {} is automated", self.turn);
            return Ok(SelectOutcome::Ignored);
        }

        let outcome = self.session.select(&mut self.board, location, Some(self.turn))?;
        match &outcome {
            SelectOutcome::Ignored => {}
            SelectOutcome::Armed { source, destinations } => self.notify(GameEvent::Selected {
                source: *source,
                destinations: destinations.clone(),
            }),
            SelectOutcome::Committed { mv, .. } => self.commit(*mv),
        }

        Ok(outcome)
    }

    /// Plays one ply for the automated side to move.
    ///
    /// The returned move is applied without consulting the rules: the decision
    /// service is trusted. On any error neither the board nor the turn changes, so
    /// calling this again sends the same request.
    pub async fn advance<S: DecisionService>(&mut self, service: &S) -> Result<Move, GameError> {
        let side = self.turn;
        let Controller::Automated(endpoint) = self.controller(side).clone() else {
            return Err(GameError::NotAutomated(side));
        };

        let body = self.request().encode()?;
        debug!("requesting move for {side} from {endpoint}");

        let mv = match self.apply_reply(service.post(&endpoint, body).await) {
            Ok(mv) => mv,
            Err(err) => {
                warn!("no move for {side} from {endpoint}: {err}");
                return Err(err);
            }
        };

        self.commit(mv);
        Ok(mv)
    }

    fn apply_reply(&mut self, reply: Result<String, DecisionError>) -> Result<Move, GameError> {
        let mv = DecisionReply::decode(&reply?)?.to_move()?;
        self.board.play(mv)?;
        Ok(mv)
    }

    /// Keeps advancing while automated sides are to move, at most `limit` plies.
    /// Returns how many plies were played.
    pub async fn advance_automated<S: DecisionService>(&mut self, service: &S, limit: Option<u32>) -> Result<u32, GameError> {
        let mut played = 0;
        while !self.awaiting_human() && limit.is_none_or(|limit| played < limit) {
            self.advance(service).await?;
            played += 1;
        }
        Ok(played)
    }

    fn commit(&mut self, mv: Move) {
        let side = self.turn;
        self.plies += 1;
        self.turn = side.opponent();
        self.session.reset();

        debug!("({}) {side} played {mv}", self.plies);
        if let Some(record) = self.board.last_move() {
            self.notify(GameEvent::Played { side, record });
        }
        self.notify(GameEvent::Turn(self.turn));
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + '_ {
        struct Impl<'a>(&'a Game, DisplayFormat);
        return Impl(self, format);

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(game, format) = self;
                let marks: &[Location] = match game.selection() {
                    Selection::Armed { destinations, .. } => destinations.as_slice(),
                    Selection::Idle => &[],
                };

                write!(f, "{}", game.board.display(format, marks))?;

                if let Some(record) = game.board.last_move()
                    && !record.is_selection()
                {
                    write!(f, "({}) {} {}{} - ", game.plies, record.piece.display(format), record.from, record.to)?;
                }

                let mover = if game.awaiting_human() { "human" } else { "automated" };
                writeln!(f, "{} to play ({mover})", game.turn)
            }
        }
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}
