use clap::Parser;
use frontend::robot::{self, Robot};
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serves moves to the player over HTTP.
#[derive(Parser, Debug)]
struct Arguments {
    #[clap(short, long, default_value_t = 8000)]
    port: u16,

    #[clap(short, long, default_value = "/ai")]
    route: String,

    #[clap(short, long)]
    seed: Option<u64>,

    /// Prefer the most valuable capture over a random move
    #[clap(short, long)]
    greedy: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let arguments = Arguments::parse();
    frontend::logging::init();

    let app = robot::router(Arc::new(Robot::new(arguments.greedy, arguments.seed)), &arguments.route)?;

    let address = SocketAddr::from(([127, 0, 0, 1], arguments.port));
    let listener = TcpListener::bind(address).await?;
    info!("robot listening at http://{address}{}", arguments.route);

    axum::serve(listener, app).await?;
    Ok(())
}
