use std::collections::HashSet;
use xiangqi::board::Board;
use xiangqi::config::GameConfig;
use xiangqi::game::Game;
use xiangqi::location::Location;
use xiangqi::piece::{PieceKind, Side};
use xiangqi::selection::{SelectOutcome, Selection};

fn at(x: i8, y: i8) -> Location {
    Location::from_xy(x, y).unwrap()
}

fn set(squares: &[(i8, i8)]) -> HashSet<Location> {
    squares.iter().map(|&(x, y)| at(x, y)).collect()
}

#[test]
fn chariot_blocked_by_own_soldier() {
    let board = Board::opening(false);

    let destinations = board.destinations(at(0, 0));
    assert_eq!(destinations.into_iter().collect::<HashSet<_>>(), set(&[(0, 1), (0, 2)]));
}

#[test]
fn cannon_slides_and_jumps_one_screen() {
    let board = Board::opening(false);
    assert_eq!(board[at(1, 2)].map(|piece| piece.kind()), Some(PieceKind::Cannon));

    let destinations = board.destinations(at(1, 2)).into_iter().collect::<HashSet<_>>();
    let expected = set(&[
        (1, 1),
        (1, 3),
        (1, 4),
        (1, 5),
        (1, 6),
        // over the opposing cannon onto the opposing horse
        (1, 9),
        (0, 2),
        (2, 2),
        (3, 2),
        (4, 2),
        (5, 2),
        (6, 2),
    ]);
    assert_eq!(destinations, expected);
    assert!(!destinations.contains(&at(1, 0)));
}

#[test]
fn flipped_opening_mirrors_destinations() {
    let board = Board::opening(false);
    let flipped = Board::opening(true);

    for (location, piece) in board.iter() {
        let mirrored = at(location.x(), 9 - location.y());
        assert_eq!(flipped[mirrored], Some(piece));

        let expected = board
            .destinations(location)
            .into_iter()
            .map(|to| at(to.x(), 9 - to.y()))
            .collect::<HashSet<_>>();
        let actual = flipped.destinations(mirrored).into_iter().collect::<HashSet<_>>();
        assert_eq!(actual, expected, "{piece} at {location}");
    }
}

#[test]
fn both_sides_have_the_same_number_of_opening_moves() {
    for red_bottom in [false, true] {
        let board = Board::opening(red_bottom);
        assert_eq!(board.iter_moves(Side::Red).count(), 44);
        assert_eq!(board.iter_moves(Side::Blue).count(), 44);
    }
}

#[test]
fn miss_click_keeps_the_session_armed() {
    let config = GameConfig::default().with_red_bottom(false);
    let mut game = Game::new(config);

    let outcome = game.select(at(0, 0)).unwrap();
    assert!(matches!(outcome, SelectOutcome::Armed { source, .. } if source == at(0, 0)));

    assert_eq!(game.select(at(4, 4)).unwrap(), SelectOutcome::Ignored);
    assert!(matches!(game.selection(), Selection::Armed { source, .. } if *source == at(0, 0)));
    assert_eq!(game.turn(), Side::Red);
    assert_eq!(game.plies(), 0);
}

#[test]
fn soldiers_advance_toward_the_opponent() {
    let board = Board::opening(false);
    assert_eq!(board.destinations(at(4, 3)), vec![at(4, 4)]);
    assert_eq!(board.destinations(at(4, 6)), vec![at(4, 5)]);

    let board = Board::opening(true);
    assert_eq!(board.destinations(at(4, 6)), vec![at(4, 5)]);
    assert_eq!(board.destinations(at(4, 3)), vec![at(4, 4)]);
}
