//! gridsift suggest コマンド
//!
//! 検索語に一致する候補値をフィールドごとに表示する。

use super::data::{self, SourceArgs};
use crate::cli::GlobalArgs;
use crate::output::{colorize, ResultSummary};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use gridsift::grid::MemoryGrid;
use gridsift::session::{InputState, SearchSession, SuggestOutcome};
use gridsift::suggest::Suggestions;

#[derive(Debug, Parser)]
pub struct Args {
    /// Search term
    pub term: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: Args) -> Result<(), String> {
    let loaded = data::load(global, &args.source)?;
    if loaded.remote && loaded.columns.is_empty() {
        return Err("--column is required with a remote source".to_string());
    }

    let mut session = SearchSession::new(
        MemoryGrid::new(loaded.rows),
        loaded.source,
        &loaded.columns,
        &loaded.settings.search,
    );

    match session.input(&args.term) {
        InputState::Idle => return Err("Search term is empty".to_string()),
        InputState::TooShort { required } => {
            return Err(format!(
                "Search term must be at least {} characters",
                required
            ))
        }
        InputState::Ready => {}
    }

    let found = match session.search().await {
        SuggestOutcome::Ready(found) => found,
        SuggestOutcome::Superseded => Suggestions::default(),
    };

    if args.json {
        print_json(&found)
    } else {
        print_table(&session, &found);
        Ok(())
    }
}

fn print_json(found: &Suggestions) -> Result<(), String> {
    serde_json::to_string_pretty(found.groups())
        .map(|json| println!("{json}"))
        .map_err(|e| format!("Failed to serialize suggestions: {}", e))
}

fn print_table(session: &SearchSession<MemoryGrid>, found: &Suggestions) {
    if found.is_empty() {
        println!("{}", ResultSummary::format(0, "suggestion"));
        return;
    }

    let plan = session.highlight_plan();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value", "Filter"]);

    for suggestion in found.iter() {
        table.add_row(vec![
            suggestion.title.clone(),
            colorize(plan.as_ref(), &suggestion.value),
            suggestion.filter_value(),
        ]);
    }

    println!("{table}");
    println!("{}", ResultSummary::format(found.len(), "suggestion"));
}
