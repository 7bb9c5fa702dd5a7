use crate::display_format::DisplayFormat;
use crate::error::{BoardError, MoveError};
use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};
use crate::rules::friendly;
use log::{debug, trace};
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// Rows of piece codes as they travel over the wire, row 0 first.
pub type Grid = [[u8; Board::WIDTH as usize]; Board::HEIGHT as usize];

/// Start position with red occupying the top rows.
const OPENING: Grid = [
    [1, 2, 3, 4, 5, 4, 3, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 6, 0, 0, 0, 0, 0, 6, 0],
    [7, 0, 7, 0, 7, 0, 7, 0, 7],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [17, 0, 17, 0, 17, 0, 17, 0, 17],
    [0, 16, 0, 0, 0, 0, 0, 16, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [11, 12, 13, 14, 15, 14, 13, 12, 11],
];

/// The most recent move, or a selection when `from == to`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LastMove {
    pub piece: Piece,
    pub from: Location,
    /// What stood on `to` before the move. For a selection this is the selected piece.
    pub target: Option<Piece>,
    pub to: Location,
}

impl LastMove {
    pub fn is_selection(&self) -> bool {
        self.from == self.to
    }

    pub fn captured(&self) -> Option<Piece> {
        if self.is_selection() { None } else { self.target }
    }
}

/// The 9x10 grid, its orientation and the last move. Holds no rules of its own
/// beyond the raw [`Board::play`] primitive.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Board {
    pieces: Vec<Option<Piece>>,
    red_bottom: bool,
    last_move: Option<LastMove>,
}

impl Board {
    pub const WIDTH: i8 = 9;
    pub const HEIGHT: i8 = 10;

    pub fn new(red_bottom: bool) -> Self {
        Self {
            pieces: vec![None; (Self::WIDTH * Self::HEIGHT) as usize],
            red_bottom,
            last_move: None,
        }
    }

    pub fn opening(red_bottom: bool) -> Self {
        let mut board = Self::new(red_bottom);
        for location in Location::iter() {
            let row = if red_bottom { Self::HEIGHT - 1 - location.y() } else { location.y() };
            let code = OPENING[row as usize][location.x() as usize];
            board[location] = Piece::from_code(code);
        }
        board
    }

    /// Parses rows listed from row 0 downward, e.g.
    /// `RHEAKAEHR/9/1C5C1/P1P1P1P1P/9/9/p1p1p1p1p/1c5c1/9/rheakaehr`.
    pub fn from_fen(fen: &str, red_bottom: bool) -> Result<Self, BoardError> {
        let invalid = || BoardError::InvalidFen(fen.to_owned());
        let mut board = Self::new(red_bottom);
        let mut y = 0;
        let mut x = 0;

        for current in fen.trim().chars() {
            match current {
                ' ' => break,
                '/' => {
                    if x != Self::WIDTH || y == Self::HEIGHT - 1 {
                        return Err(invalid());
                    }
                    x = 0;
                    y += 1;
                }
                '1'..='9' => x += current.to_digit(10).ok_or_else(invalid)? as i8,
                _ => {
                    let piece = Piece::from_fen_char(current).ok_or_else(invalid)?;
                    let location = Location::from_xy(x, y).ok_or_else(invalid)?;
                    board[location] = Some(piece);
                    x += 1;
                }
            }

            if x > Self::WIDTH {
                return Err(invalid());
            }
        }

        if x != Self::WIDTH || y != Self::HEIGHT - 1 {
            return Err(invalid());
        }

        Ok(board)
    }

    pub fn fen(&self) -> String {
        let mut result = String::new();
        for y in 0..Self::HEIGHT {
            if y > 0 {
                result.push('/');
            }

            let mut empty = 0;
            for x in 0..Self::WIDTH {
                match Location::from_xy(x, y).and_then(|location| self[location]) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                result.push_str(&empty.to_string());
            }
        }
        result
    }

    pub fn from_codes(grid: &Grid, red_bottom: bool) -> Result<Self, BoardError> {
        let mut board = Self::new(red_bottom);
        for (y, row) in grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                if code == 0 {
                    continue;
                }

                let piece = Piece::from_code(code).ok_or(BoardError::InvalidCode { code, x, y })?;
                let location = Location::from_xy(x as i8, y as i8).ok_or(BoardError::InvalidCode { code, x, y })?;
                board[location] = Some(piece);
            }
        }
        Ok(board)
    }

    pub fn codes(&self) -> Grid {
        let mut grid = [[0; Self::WIDTH as usize]; Self::HEIGHT as usize];
        for (location, piece) in self.iter() {
            grid[location.y() as usize][location.x() as usize] = piece.code();
        }
        grid
    }

    /// Guesses the orientation of a bare grid from where the generals stand.
    /// Without either general the red-bottom layout is assumed.
    pub fn detect_red_bottom(grid: &Grid) -> bool {
        let mut board = Self::new(true);
        for location in Location::iter() {
            let code = grid[location.y() as usize][location.x() as usize];
            if let Some(piece) = Piece::from_code(code) {
                board.place(location, piece);
            }
        }

        match (board.find_general(Side::Red), board.find_general(Side::Blue)) {
            (Some(general), _) => general.in_territory(Side::Red, true),
            (None, Some(general)) => general.in_territory(Side::Blue, true),
            (None, None) => true,
        }
    }

    pub fn red_bottom(&self) -> bool {
        self.red_bottom
    }

    /// The same pieces read with another orientation.
    pub fn with_red_bottom(self, red_bottom: bool) -> Self {
        Self { red_bottom, ..self }
    }

    pub fn piece_at(&self, location: Location) -> Option<Piece> {
        self[location]
    }

    /// Lookup by raw coordinates. The outer `None` means the square does not exist.
    pub fn probe(&self, x: i64, y: i64) -> Option<Option<Piece>> {
        Location::from_wide(x, y).map(|location| self[location])
    }

    pub fn place(&mut self, location: Location, piece: Piece) {
        self[location] = Some(piece);
    }

    pub fn clear(&mut self, location: Location) -> Option<Piece> {
        self[location].take()
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn record_last_move(&mut self, record: LastMove) {
        self.last_move = Some(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, Piece)> + '_ {
        Location::iter().filter_map(|location| self[location].map(|piece| (location, piece)))
    }

    pub fn find_general(&self, side: Side) -> Option<Location> {
        let general = Piece::new(PieceKind::General, side);
        self.iter().find(|&(_, piece)| piece == general).map(|(location, _)| location)
    }

    /// Moves whatever stands on `mv.from` onto `mv.to`, discarding the target.
    ///
    /// Only occupancy is checked: the source must hold a piece and the target must not
    /// hold one of the same side. Whether the piece may actually travel there is the
    /// caller's business. Returns the captured piece.
    pub fn play(&mut self, mv: Move) -> Result<Option<Piece>, MoveError> {
        let Some(piece) = self[mv.from] else {
            debug!("rejected {mv}: no piece at {}", mv.from);
            return Err(MoveError::EmptySource(mv.from));
        };

        let target = self[mv.to];
        if friendly(Some(piece), target) {
            debug!("rejected {mv}: {piece} cannot capture its own side");
            return Err(MoveError::FriendlyCapture { from: mv.from, to: mv.to });
        }

        self[mv.to] = Some(piece);
        self[mv.from] = None;
        self.record_last_move(LastMove {
            piece,
            from: mv.from,
            target,
            to: mv.to,
        });

        Ok(target)
    }

    /// Marks `location` as selected in the last-move record without moving anything.
    pub fn select(&mut self, location: Location) -> bool {
        let Some(piece) = self[location] else {
            return false;
        };

        trace!("selected {piece} at {location}");
        self.record_last_move(LastMove {
            piece,
            from: location,
            target: Some(piece),
            to: location,
        });
        true
    }

    /// Renders the board, highlighting the last move and the squares in `marks`.
    pub fn display<'a>(&'a self, format: DisplayFormat, marks: &'a [Location]) -> impl Display + 'a {
        struct Impl<'a>(&'a Board, DisplayFormat, &'a [Location]);
        return Impl(self, format, marks);

        impl Impl<'_> {
            fn format_cell(&self, f: &mut Formatter<'_>, location: Location) -> std::fmt::Result {
                let &Self(board, format, marks) = self;
                let last = board.last_move;

                if let Some(piece) = board[location] {
                    let piece = piece.display(format);
                    let highlight = last.is_some_and(|last| last.to == location);
                    return if format.effects && highlight {
                        write!(f, " \x1B[3m{piece}\x1B[0m")
                    } else if highlight {
                        write!(f, "[{piece}")
                    } else {
                        write!(f, " {piece}")
                    };
                }

                if marks.contains(&location) {
                    return if format.effects {
                        write!(f, " \x1B[32m++\x1B[0m")
                    } else {
                        write!(f, " ++")
                    };
                }

                if last.is_some_and(|last| last.from == location) {
                    write!(f, " ╶╴")
                } else {
                    write!(f, "   ")
                }
            }
        }

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                for y in 0..Board::HEIGHT {
                    write!(f, "{y}")?;
                    for location in (0..Board::WIDTH).filter_map(|x| Location::from_xy(x, y)) {
                        self.format_cell(f, location)?;
                    }
                    writeln!(f)?;

                    if y == 4 {
                        writeln!(f, "  {}", "~".repeat(3 * Board::WIDTH as usize - 1))?;
                    }
                }

                write!(f, " ")?;
                for char in 'a'..='i' {
                    write!(f, "  {char}")?;
                }
                writeln!(f)
            }
        }
    }
}

impl Index<Location> for Board {
    type Output = Option<Piece>;
    fn index(&self, index: Location) -> &Self::Output {
        &self.pieces[index.index()]
    }
}

impl IndexMut<Location> for Board {
    fn index_mut(&mut self, index: Location) -> &mut Self::Output {
        &mut self.pieces[index.index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string(), &[]))
    }
}
