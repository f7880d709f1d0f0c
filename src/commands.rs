use crate::cli::Command;

pub mod data;
pub mod filter;
pub mod suggest;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<(), String> {
    match cli.command {
        Command::Suggest(args) => suggest::run(&cli.global, args).await,
        Command::Filter(args) => filter::run(&cli.global, args).await,
    }
}
