use crate::board::Board;
use crate::error::MoveError;
use crate::piece::Side;
use std::fmt::Formatter;
use std::str::{Chars, FromStr};

/// An intersection on the board. `x` is the column counted from the left,
/// `y` is the row counted from the top, whichever side sits at the bottom.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    x: i8,
    y: i8,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub from: Location,
    pub to: Location,
}

impl Location {
    pub fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn from_xy(x: i8, y: i8) -> Option<Self> {
        Self::new().shift_xy(x, y)
    }

    /// Like [`Location::from_xy`] but for coordinates of unknown width,
    /// such as the ones received from a decision service.
    pub fn from_wide(x: i64, y: i64) -> Option<Self> {
        Self::from_xy(i8::try_from(x).ok()?, i8::try_from(y).ok()?)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= (Board::WIDTH * Board::HEIGHT) as usize {
            return None;
        }
        let x = index as i8 % Board::WIDTH;
        let y = index as i8 / Board::WIDTH;
        Self::from_xy(x, y)
    }

    pub fn from_chars(chars: &mut Chars<'_>) -> Option<Self> {
        let x = chars.next().filter(char::is_ascii)?.to_ascii_lowercase() as u8;
        let y = chars.next().filter(char::is_ascii)? as u8;
        Self::from_xy(x.wrapping_sub(b'a') as i8, y.wrapping_sub(b'0') as i8)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..(Board::WIDTH * Board::HEIGHT) as usize).filter_map(Self::from_index)
    }

    pub fn shift_x(&self, x: i8) -> Option<Self> {
        let new_x = self.x.checked_add(x)?;
        if 0 > new_x || new_x >= Board::WIDTH {
            return None;
        }
        Some(Self { x: new_x, y: self.y })
    }

    pub fn shift_y(&self, y: i8) -> Option<Self> {
        let new_y = self.y.checked_add(y)?;
        if 0 > new_y || new_y >= Board::HEIGHT {
            return None;
        }
        Some(Self { x: self.x, y: new_y })
    }

    pub fn shift_xy(&self, x: i8, y: i8) -> Option<Self> {
        self.shift_x(x)?.shift_y(y)
    }

    pub fn index(&self) -> usize {
        (self.x + self.y * Board::WIDTH) as usize
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    /// Whether this location lies on the upper half of the board (rows 0 to 4).
    pub fn upper_half(&self) -> bool {
        self.y < 5
    }

    /// Palace membership. With `side` unset either palace counts; otherwise only
    /// the palace at that side's home rows, which depends on the board orientation.
    pub fn in_palace(&self, side: Option<(Side, bool)>) -> bool {
        if !(3..=5).contains(&self.x) {
            return false;
        }

        let top = (0..=2).contains(&self.y);
        let bottom = (7..=9).contains(&self.y);
        match side {
            None => top || bottom,
            Some((side, red_bottom)) if side.home_is_bottom(red_bottom) => bottom,
            Some(_) => top,
        }
    }

    /// Whether this location is on `side`'s own half of the river.
    pub fn in_territory(&self, side: Side, red_bottom: bool) -> bool {
        self.upper_half() != side.home_is_bottom(red_bottom)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y)
    }
}

impl FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let location = Self::from_chars(&mut chars).ok_or(())?;
        match chars.next() {
            None => Ok(location),
            Some(_) => Err(()),
        }
    }
}

impl Move {
    pub fn new(from: Location, to: Location) -> Self {
        Self { from, to }
    }

    /// Builds a move out of `[from_x, from_y, to_x, to_y]`.
    pub fn from_coordinates([fx, fy, tx, ty]: [i64; 4]) -> Result<Self, MoveError> {
        let from = Location::from_wide(fx, fy).ok_or(MoveError::OutOfRange { x: fx, y: fy })?;
        let to = Location::from_wide(tx, ty).ok_or(MoveError::OutOfRange { x: tx, y: ty })?;
        Ok(Self { from, to })
    }

    pub fn coordinates(&self) -> [i64; 4] {
        [self.from.x, self.from.y, self.to.x, self.to.y].map(i64::from)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let from = Location::from_chars(&mut chars).ok_or(())?;
        let to = Location::from_chars(&mut chars).ok_or(())?;
        match chars.next() {
            None => Ok(Self { from, to }),
            Some(_) => Err(()),
        }
    }
}
