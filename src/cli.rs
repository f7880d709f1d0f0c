use clap::{Parser, Subcommand};
use gridsift::filter::QuerySyntax;
use std::path::PathBuf;

use crate::commands::{filter, suggest};

#[derive(Debug, Parser)]
#[command(name = "gridsift")]
#[command(about = "Incremental search and filtering for hierarchical grid data", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

// 全サブコマンド共通のオプション
#[derive(Debug, Clone, clap::Args)]
pub struct GlobalArgs {
    /// Config file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Syntax of search terms and filter values (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub syntax: Option<QuerySyntax>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show data values matching a search term, grouped by column
    Suggest(suggest::Args),

    /// Apply filters and print the visible rows with highlights
    Filter(filter::Args),
}
