use minesweeper_engine::{config::load_params, logic::Game, session::Session};
use tokio::io::{self, BufReader};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let game = Game::new(load_params())?;
    let mut session = Session::new(game, io::stdout());
    session.run(BufReader::new(io::stdin())).await?;

    Ok(())
}
