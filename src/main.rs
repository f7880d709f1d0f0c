mod cli;
mod commands;
mod output;

use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = cli::Cli::parse();

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
