use crate::board::Board;
use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
const HORSE: [(i8, i8); 8] = [(1, 2), (-1, 2), (1, -2), (-1, -2), (2, 1), (2, -1), (-2, 1), (-2, -1)];
const ELEPHANT: [(i8, i8); 4] = [(2, 2), (-2, 2), (2, -2), (-2, -2)];

/// Whether two squares hold pieces of the same side. An empty square is nobody's friend.
pub fn friendly(a: Option<Piece>, b: Option<Piece>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.side() == b.side(),
        _ => false,
    }
}

/// [`friendly`] over raw wire codes; codes that are not pieces count as empty.
pub fn friendly_codes(a: u8, b: u8) -> bool {
    friendly(Piece::from_code(a), Piece::from_code(b))
}

impl PieceKind {
    /// Squares a piece of this kind standing on `from` may travel to.
    pub fn destinations(self, board: &Board, from: Location, side: Side) -> Vec<Location> {
        let mut result = Vec::new();
        let walker = Walker { board, from, side };
        match self {
            Self::Chariot => walker.chariot(&mut result),
            Self::Horse => walker.horse(&mut result),
            Self::Elephant => walker.elephant(&mut result),
            Self::Advisor => walker.steps(&DIAGONAL, |to| to.in_palace(None), &mut result),
            Self::General => walker.steps(&ORTHOGONAL, |to| to.in_palace(None), &mut result),
            Self::Cannon => walker.cannon(&mut result),
            Self::Soldier => walker.soldier(&mut result),
        }
        result
    }
}

impl Board {
    /// Legal destinations of the piece on `from`, empty for an empty square.
    pub fn destinations(&self, from: Location) -> Vec<Location> {
        match self[from] {
            Some(piece) => piece.kind().destinations(self, from, piece.side()),
            None => Vec::new(),
        }
    }

    /// [`Board::destinations`] for raw coordinates; nothing is reachable from off the board.
    pub fn destinations_xy(&self, x: i64, y: i64) -> Vec<Location> {
        Location::from_wide(x, y)
            .map(|from| self.destinations(from))
            .unwrap_or_default()
    }

    /// Every move available to the pieces of `side`, ignoring checks.
    pub fn iter_moves(&self, side: Side) -> impl Iterator<Item = Move> + '_ {
        self.iter()
            .filter(move |(_, piece)| piece.side() == side)
            .flat_map(|(from, _)| self.destinations(from).into_iter().map(move |to| Move { from, to }))
    }
}

struct Walker<'a> {
    board: &'a Board,
    from: Location,
    side: Side,
}

impl Walker<'_> {
    /// Target square of an offset if it exists and is not held by our own side.
    fn landing(&self, dx: i8, dy: i8) -> Option<Location> {
        let to = self.from.shift_xy(dx, dy)?;
        match self.board[to] {
            Some(piece) if piece.side() == self.side => None,
            _ => Some(to),
        }
    }

    fn occupied(&self, dx: i8, dy: i8) -> bool {
        self.from
            .shift_xy(dx, dy)
            .is_some_and(|location| self.board[location].is_some())
    }

    /// Single steps that must satisfy `allowed` at the destination.
    fn steps(&self, offsets: &[(i8, i8)], allowed: impl Fn(Location) -> bool, result: &mut Vec<Location>) {
        let targets = offsets.iter().filter_map(|&(dx, dy)| self.landing(dx, dy));
        result.extend(targets.filter(|&to| allowed(to)));
    }

    /// Squares along a ray, starting one step away from `start`, until the board edge.
    fn ray(start: Location, (dx, dy): (i8, i8)) -> impl Iterator<Item = Location> {
        std::iter::successors(start.shift_xy(dx, dy), move |location| location.shift_xy(dx, dy))
    }

    fn chariot(&self, result: &mut Vec<Location>) {
        for direction in ORTHOGONAL {
            for to in Self::ray(self.from, direction) {
                match self.board[to] {
                    None => result.push(to),
                    Some(piece) => {
                        if piece.side() != self.side {
                            result.push(to);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn cannon(&self, result: &mut Vec<Location>) {
        for direction in ORTHOGONAL {
            let mut ray = Self::ray(self.from, direction);
            for to in ray.by_ref() {
                if self.board[to].is_some() {
                    break;
                }
                result.push(to);
            }

            // the rest of the ray lies behind the screen, if there was one
            let target = ray.find_map(|to| self.board[to].map(|piece| (to, piece)));
            if let Some((to, piece)) = target
                && piece.side() != self.side
            {
                result.push(to);
            }
        }
    }

    fn horse(&self, result: &mut Vec<Location>) {
        for (dx, dy) in HORSE {
            // the leg is the orthogonal neighbour in the direction of the long stride
            let (lx, ly) = if dx.abs() > dy.abs() { (dx / 2, 0) } else { (0, dy / 2) };
            if self.occupied(lx, ly) {
                continue;
            }

            result.extend(self.landing(dx, dy));
        }
    }

    fn elephant(&self, result: &mut Vec<Location>) {
        for (dx, dy) in ELEPHANT {
            let Some(to) = self.landing(dx, dy) else {
                continue;
            };

            if to.upper_half() != self.from.upper_half() || self.occupied(dx / 2, dy / 2) {
                continue;
            }

            result.push(to);
        }
    }

    fn soldier(&self, result: &mut Vec<Location>) {
        let forward = self.side.forward(self.board.red_bottom());
        let crossed = !self.from.in_territory(self.side, self.board.red_bottom());

        result.extend(self.landing(0, forward));
        if crossed {
            result.extend(self.landing(1, 0));
            result.extend(self.landing(-1, 0));
        }
    }
}
