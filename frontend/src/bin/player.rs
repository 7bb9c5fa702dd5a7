use clap::Parser;
use frontend::http::HttpDecisionService;
use log::{info, warn};
use std::error::Error;
use std::io::Write;
use std::time::Duration;
use xiangqi::board::Board;
use xiangqi::config::GameConfig;
use xiangqi::display_format::DisplayFormat;
use xiangqi::error::GameError;
use xiangqi::game::{Game, GameEvent};
use xiangqi::location::{Location, Move};
use xiangqi::piece::Side;

/// Plays a game in the terminal. Sides without an endpoint are played from stdin.
#[derive(Parser, Debug)]
struct Arguments {
    /// Decision endpoint for red, for example http://127.0.0.1:8000/ai
    #[clap(long, env = "XIANGQI_RED_ENDPOINT")]
    red: Option<String>,

    /// Decision endpoint for blue
    #[clap(long, env = "XIANGQI_BLUE_ENDPOINT")]
    blue: Option<String>,

    /// Start with red on the upper half of the board
    #[clap(long)]
    red_top: bool,

    /// Let blue make the first move
    #[clap(long)]
    blue_first: bool,

    /// Starting position, rows listed from the top
    #[clap(long)]
    fen: Option<String>,

    /// Seconds to wait for a decision endpoint
    #[clap(short, long, default_value_t = 10)]
    timeout: u64,

    /// Attempts to repeat a failed decision request
    #[clap(short, long, default_value_t = 3)]
    retries: u32,

    /// Stop after this many plies
    #[clap(short, long)]
    limit: Option<u32>,

    /// Letters instead of Chinese glyphs
    #[clap(long)]
    ascii: bool,

    /// No colours
    #[clap(long)]
    plain: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let arguments = Arguments::parse();
    frontend::logging::init();

    DisplayFormat::set_default_chinese(!arguments.ascii);
    DisplayFormat::set_default_effects(!arguments.plain);

    let first = if arguments.blue_first { Side::Blue } else { Side::Red };
    let config = GameConfig::from_endpoints(arguments.red.as_deref(), arguments.blue.as_deref())?
        .with_red_bottom(!arguments.red_top)
        .with_first(first);

    let mut game = match &arguments.fen {
        Some(fen) => Game::with_board(Board::from_fen(fen, config.red_bottom)?, config),
        None => Game::new(config),
    };

    let service = HttpDecisionService::new(Duration::from_secs(arguments.timeout))?;
    let events = game.subscribe();
    let mut lines = std::io::stdin().lines();

    info!("red: {:?}, blue: {:?}", game.controller(Side::Red), game.controller(Side::Blue));

    loop {
        while let Ok(event) = events.try_recv() {
            if let GameEvent::Played { side, record } = event {
                info!("{side} {} {}{}", record.piece, record.from, record.to);
            }
        }

        if let Some(limit) = arguments.limit
            && game.plies() >= limit
        {
            info!("stopping after {limit} plies");
            break;
        }

        print!("{}", game.display(DisplayFormat::pretty()));

        if !game.awaiting_human() {
            smol::block_on(advance(&mut game, &service, arguments.retries))?;
            continue;
        }

        print!("{} > ", game.turn());
        std::io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            input => click(&mut game, input)?,
        }
    }

    Ok(())
}

/// Accepts a square such as `b7`, or a whole move such as `b7b0`.
fn click(game: &mut Game, input: &str) -> Result<(), GameError> {
    if let Ok(location) = input.parse::<Location>() {
        game.select(location)?;
    } else if let Ok(mv) = input.parse::<Move>() {
        game.select(mv.from)?;
        game.select(mv.to)?;
    } else {
        warn!("expected a square like a0 or a move like a0a2, got {input:?}");
    }
    Ok(())
}

async fn advance(game: &mut Game, service: &HttpDecisionService, retries: u32) -> Result<(), GameError> {
    let mut attempt = 0;
    loop {
        match game.advance(service).await {
            Ok(_) => return Ok(()),
            Err(err) if attempt < retries => {
                attempt += 1;
                warn!("retrying {} ({attempt}/{retries}): {err}", game.turn());
            }
            Err(err) => return Err(err),
        }
    }
}
