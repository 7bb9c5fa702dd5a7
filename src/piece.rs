use crate::display_format::DisplayFormat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One of the two factions. Red is the first-named faction and owns codes 1 to 7,
/// blue owns codes 11 to 17.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }

    pub fn home_is_bottom(self, red_bottom: bool) -> bool {
        (self == Self::Red) == red_bottom
    }

    /// Row step a soldier of this side takes when advancing.
    pub fn forward(self, red_bottom: bool) -> i8 {
        if self.home_is_bottom(red_bottom) { -1 } else { 1 }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Chariot = 1,
    Horse,
    Elephant,
    Advisor,
    General,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::Chariot,
        Self::Horse,
        Self::Elephant,
        Self::Advisor,
        Self::General,
        Self::Cannon,
        Self::Soldier,
    ];

    fn from_offset(offset: u8) -> Option<Self> {
        Self::ALL.get(usize::from(offset).checked_sub(1)?).copied()
    }

    pub fn base_value(self) -> i32 {
        match self {
            Self::General => 1000000,
            Self::Advisor => 2000,
            Self::Elephant => 2000,
            Self::Horse => 4000,
            Self::Chariot => 9000,
            Self::Cannon => 4500,
            Self::Soldier => 1500,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Piece {
    kind: PieceKind,
    side: Side,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Decodes a nonzero wire code. Anything outside 1..=7 and 11..=17 is not a piece.
    pub fn from_code(code: u8) -> Option<Self> {
        let side = match code {
            1..=7 => Side::Red,
            11..=17 => Side::Blue,
            _ => return None,
        };
        Some(Self::new(PieceKind::from_offset(code % 10)?, side))
    }

    pub fn code(&self) -> u8 {
        let offset = self.kind as u8;
        match self.side {
            Side::Red => offset,
            Side::Blue => offset + 10,
        }
    }

    pub fn from_fen_char(value: char) -> Option<Self> {
        let kind = match value.to_ascii_lowercase() {
            'r' => PieceKind::Chariot,
            'h' => PieceKind::Horse,
            'e' => PieceKind::Elephant,
            'a' => PieceKind::Advisor,
            'k' => PieceKind::General,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };

        let side = if value.is_ascii_uppercase() { Side::Red } else { Side::Blue };
        Some(Self::new(kind, side))
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn fen_char(&self) -> char {
        let result = match self.kind {
            PieceKind::Chariot => 'r',
            PieceKind::Horse => 'h',
            PieceKind::Elephant => 'e',
            PieceKind::Advisor => 'a',
            PieceKind::General => 'k',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match self.side {
            Side::Red => result.to_ascii_uppercase(),
            Side::Blue => result,
        }
    }

    pub fn chinese_char(&self) -> char {
        match (self.side, self.kind) {
            (_, PieceKind::Chariot) => '車',
            (_, PieceKind::Horse) => '马',
            (_, PieceKind::Cannon) => '炮',
            (Side::Red, PieceKind::Elephant) => '相',
            (Side::Red, PieceKind::Advisor) => '仕',
            (Side::Red, PieceKind::General) => '帅',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Blue, PieceKind::Elephant) => '象',
            (Side::Blue, PieceKind::Advisor) => '士',
            (Side::Blue, PieceKind::General) => '将',
            (Side::Blue, PieceKind::Soldier) => '卒',
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display {
        let s = if format.chinese {
            self.chinese_char().to_string()
        } else {
            let c = self.fen_char();
            format!("{c}{c}")
        };

        if !format.effects {
            return s;
        }

        match self.side {
            Side::Red => format!("\x1B[31m{s}\x1B[0m"),
            Side::Blue => format!("\x1B[34m{s}\x1B[0m"),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        for code in 0..=u8::MAX {
            let expected = matches!(code, 1..=7 | 11..=17);
            let piece = Piece::from_code(code);
            assert_eq!(piece.is_some(), expected, "code {code}");
            if let Some(piece) = piece {
                assert_eq!(piece.code(), code);
                assert_eq!(piece.side() == Side::Blue, code > 10);
            }
        }

        assert_eq!(Piece::from_code(1).unwrap().kind(), PieceKind::Chariot);
        assert_eq!(Piece::from_code(15).unwrap().kind(), PieceKind::General);
        assert_eq!(Piece::from_code(17).unwrap().kind(), PieceKind::Soldier);
    }

    #[test]
    fn fen_chars() {
        let piece = Piece::from_fen_char('H').unwrap();
        assert_eq!(piece, Piece::new(PieceKind::Horse, Side::Red));
        assert_eq!(piece.fen_char(), 'H');
        assert_eq!(Piece::from_fen_char('k').unwrap().code(), 15);
        assert!(Piece::from_fen_char('q').is_none());
    }

    #[test]
    fn forward_direction() {
        assert_eq!(Side::Red.forward(true), -1);
        assert_eq!(Side::Blue.forward(true), 1);
        assert_eq!(Side::Red.forward(false), 1);
        assert_eq!(Side::Blue.forward(false), -1);
    }

    #[test]
    fn side_labels() {
        assert_eq!(serde_json::to_string(&Side::Blue).unwrap(), "\"blue\"");
        assert_eq!(serde_json::from_str::<Side>("\"red\"").unwrap(), Side::Red);
        assert_eq!(Side::Red.opponent(), Side::Blue);
    }
}
