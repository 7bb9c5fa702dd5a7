use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::post;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use xiangqi::board::Board;
use xiangqi::error::{BoardError, ConfigError, DecisionError};
use xiangqi::location::Move;
use xiangqi::piece::Side;
use xiangqi::protocol::{DecisionReply, DecisionRequest};

#[derive(Error, Debug)]
pub enum RobotError {
    #[error("undecodable request: {0}")]
    Request(#[from] DecisionError),
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("{0} has no move")]
    NoMove(Side),
}

/// A decision service that plays random moves, or greedy captures when asked to.
pub struct Robot {
    greedy: bool,
    random: Mutex<StdRng>,
}

impl Robot {
    pub fn new(greedy: bool, seed: Option<u64>) -> Self {
        let random = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            greedy,
            random: Mutex::new(random),
        }
    }

    /// Answers one request body. The board orientation is inferred from the generals.
    pub fn decide(&self, body: &str) -> Result<DecisionReply, RobotError> {
        let request = DecisionRequest::decode(body)?;
        let red_bottom = Board::detect_red_bottom(&request.chessboard);
        let board = Board::from_codes(&request.chessboard, red_bottom)?;

        let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
        let mv = choose_move(&board, request.round, self.greedy, &mut *random).ok_or(RobotError::NoMove(request.round))?;

        debug!("{} plays {mv}", request.round);
        Ok(DecisionReply::from(mv))
    }
}

impl RobotError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Request(_) | Self::Board(_) => StatusCode::BAD_REQUEST,
            Self::NoMove(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Serves `robot` on `POST {route}`.
pub fn router(robot: Arc<Robot>, route: &str) -> Result<Router, ConfigError> {
    if !route.starts_with('/') || route.contains(['{', '}']) {
        return Err(ConfigError::InvalidRoute { route: route.to_owned() });
    }

    Ok(Router::new().route(route, post(decide)).with_state(robot))
}

async fn decide(State(robot): State<Arc<Robot>>, body: String) -> Result<Json<DecisionReply>, (StatusCode, String)> {
    robot.decide(&body).map(Json).map_err(|err| {
        warn!("{err}");
        (err.status(), err.to_string())
    })
}

/// Picks one of `side`'s moves. Greedy play takes the most valuable capture available,
/// breaking ties at random, and falls back to a random move when nothing can be taken.
pub fn choose_move<R: Rng>(board: &Board, side: Side, greedy: bool, random: &mut R) -> Option<Move> {
    let mut moves = board.iter_moves(side).collect::<Vec<_>>();

    if greedy {
        let value = |mv: &Move| board[mv.to].map_or(0, |target| target.kind().base_value());
        if let Some(best) = moves.iter().map(value).max()
            && best > 0
        {
            moves.retain(|mv| value(mv) == best);
        }
    }

    if moves.is_empty() {
        return None;
    }

    Some(moves[random.random_range(0..moves.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use xiangqi::location::Location;

    fn at(x: i8, y: i8) -> Location {
        Location::from_xy(x, y).unwrap()
    }

    #[test]
    fn random_moves_are_legal() {
        let board = Board::opening(true);
        let mut random = StdRng::seed_from_u64(3);

        for side in [Side::Red, Side::Blue] {
            for _ in 0..32 {
                let mv = choose_move(&board, side, false, &mut random).unwrap();
                assert_eq!(board[mv.from].map(|piece| piece.side()), Some(side));
                assert!(board.destinations(mv.from).contains(&mv.to));
            }
        }
    }

    #[test]
    fn greedy_takes_the_most_valuable_piece() {
        // a red chariot that can take either a blue horse or a blue soldier
        let board = Board::from_fen("9/9/9/9/9/9/h8/9/9/R2p5", true).unwrap();
        let mut random = StdRng::seed_from_u64(11);

        for _ in 0..8 {
            let mv = choose_move(&board, Side::Red, true, &mut random).unwrap();
            assert_eq!(mv, Move::new(at(0, 9), at(0, 6)));
        }
    }

    #[test]
    fn greedy_without_captures_plays_anything() {
        let board = Board::opening(true);
        let mut random = StdRng::seed_from_u64(5);

        let mv = choose_move(&board, Side::Red, true, &mut random).unwrap();
        assert!(board.destinations(mv.from).contains(&mv.to));
    }

    #[test]
    fn same_seed_same_game() {
        let body = DecisionRequest::new(&Board::opening(false), Side::Blue).encode().unwrap();
        let first = Robot::new(false, Some(42));
        let second = Robot::new(false, Some(42));

        for _ in 0..4 {
            assert_eq!(first.decide(&body).unwrap(), second.decide(&body).unwrap());
        }
    }

    #[test]
    fn decides_in_either_orientation() {
        let robot = Robot::new(false, Some(1));

        for red_bottom in [false, true] {
            let board = Board::opening(red_bottom);
            let body = DecisionRequest::new(&board, Side::Red).encode().unwrap();
            let mv = robot.decide(&body).unwrap().to_move().unwrap();

            assert_eq!(board[mv.from].map(|piece| piece.side()), Some(Side::Red));
            assert!(board.destinations(mv.from).contains(&mv.to));
        }
    }

    #[test]
    fn bad_requests() {
        let robot = Robot::new(false, None);
        assert!(matches!(robot.decide("{}"), Err(RobotError::Request(_))));

        let mut request = DecisionRequest::new(&Board::opening(true), Side::Red);
        request.chessboard[4][4] = 9;
        assert!(matches!(robot.decide(&request.encode().unwrap()), Err(RobotError::Board(_))));

        let lonely = Board::from_fen("4k4/9/9/9/9/9/9/9/9/9", true).unwrap();
        let body = DecisionRequest::new(&lonely, Side::Red).encode().unwrap();
        assert!(matches!(robot.decide(&body), Err(RobotError::NoMove(Side::Red))));
    }

    async fn post_ai(body: String) -> (StatusCode, String) {
        let app = router(Arc::new(Robot::new(false, Some(9))), "/ai").unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ai")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn serves_a_move() {
        let board = Board::opening(true);
        let (status, body) = post_ai(DecisionRequest::new(&board, Side::Blue).encode().unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let mv = DecisionReply::decode(&body).unwrap().to_move().unwrap();
        assert_eq!(board[mv.from].map(|piece| piece.side()), Some(Side::Blue));
        assert!(board.destinations(mv.from).contains(&mv.to));
    }

    #[tokio::test]
    async fn rejects_bad_requests() {
        let (status, _) = post_ai("[0, 0, 0, 1]".to_owned()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut request = DecisionRequest::new(&Board::opening(true), Side::Red);
        request.chessboard[0][0] = 8;
        let (status, _) = post_ai(request.encode().unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn no_move_is_unprocessable() {
        let lonely = Board::from_fen("4k4/9/9/9/9/9/9/9/9/9", true).unwrap();
        let (status, body) = post_ai(DecisionRequest::new(&lonely, Side::Red).encode().unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "red has no move");
    }

    #[test]
    fn routes_must_be_paths() {
        let robot = Arc::new(Robot::new(false, None));
        assert!(router(robot.clone(), "/ai").is_ok());
        assert!(router(robot.clone(), "/robot/move").is_ok());
        for route in ["ai", "", "/{side}"] {
            assert_eq!(
                router(robot.clone(), route).err(),
                Some(ConfigError::InvalidRoute { route: route.to_owned() })
            );
        }
    }
}
