//! gridsift filter コマンド
//!
//! フィルタを適用し、表示される行（ツリーの展開状態込み）をハイライト付きで出力する。

use super::data::{self, SourceArgs};
use crate::cli::GlobalArgs;
use crate::output::{highlight_cell, ResultSummary};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use gridsift::column::Column;
use gridsift::grid::{MemoryGrid, VisibleRow};
use gridsift::session::{ApplyOutcome, SearchSession};
use gridsift::tree::TreeView;
use gridsift::SiftError;
use serde::Serialize;
use serde_json::{Map, Value};

const FILTER_HELP: &str = "\
FILTER SYNTAX:
    -f name=bob              rows whose name contains \"bob\" (case-insensitive)
    -f name=bob -f name=eve  values of one field are OR-ed
    -f name=bob -f city=lyon different fields are AND-ed

  With --syntax operators a value may start with an operator:
    =, !=, >, <, >=, <=, like, not like, starts with, ends with
    e.g. -f \"qty=>= 10\" -f \"code=starts with AB\"

  A parent row is shown (and expanded) when any descendant matches.";

#[derive(Debug, Parser)]
#[command(after_help = FILTER_HELP)]
pub struct Args {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Filter value as field=value (repeatable; values of one field are OR-ed)
    #[arg(short = 'f', long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Live search term to highlight
    #[arg(long)]
    pub term: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// JSON出力の1行
#[derive(Debug, Serialize)]
struct RowOutput {
    path: String,
    depth: usize,
    expanded: bool,
    data: Map<String, Value>,
}

pub async fn run(global: &GlobalArgs, args: Args) -> Result<(), String> {
    let loaded = data::load(global, &args.source)?;
    let remote = loaded.remote;
    let given_columns = loaded.columns.clone();

    let mut session = SearchSession::new(
        MemoryGrid::new(loaded.rows),
        loaded.source,
        &loaded.columns,
        &loaded.settings.search,
    );

    for (field, value) in &args.filters {
        let title = column_title(&given_columns, field);
        session.add_filter(field, value, &title);
    }

    let pending = session.begin_apply();
    match session.apply(pending).await {
        ApplyOutcome::Failed => return Err("Failed to fetch rows from the remote source".to_string()),
        ApplyOutcome::Superseded => return Err("Filter was superseded".to_string()),
        ApplyOutcome::Filtered | ApplyOutcome::Cleared | ApplyOutcome::Replaced { .. } => {}
    }

    if let Some(term) = &args.term {
        session.input(term);
    }

    let columns = if remote && given_columns.is_empty() {
        data::infer_columns(session.grid().rows())
    } else {
        given_columns
    };

    let visible = session.grid().visible_rows();
    if args.json {
        print_json(&session, &visible)
    } else {
        print_table(&session, &visible, &columns);
        Ok(())
    }
}

fn column_title(columns: &[Column], field: &str) -> String {
    columns
        .iter()
        .find(|c| c.field == field)
        .map(|c| c.title.clone())
        .unwrap_or_else(|| field.to_string())
}

/// `field=value` をパースする
fn parse_filter(spec: &str) -> Result<(String, String), SiftError> {
    match spec.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() && !value.is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(SiftError::InvalidArgument(format!(
            "filter '{}': expected FIELD=VALUE",
            spec
        ))),
    }
}

fn print_json(session: &SearchSession<MemoryGrid>, visible: &[VisibleRow<'_>]) -> Result<(), String> {
    let rows: Vec<RowOutput> = visible
        .iter()
        .map(|v| RowOutput {
            path: v.path.to_string(),
            depth: v.depth(),
            expanded: v.expanded,
            data: v
                .row
                .data()
                .iter()
                .map(|(k, value)| (k.clone(), session.render_cell(value).into_owned()))
                .collect(),
        })
        .collect();

    serde_json::to_string_pretty(&rows)
        .map(|json| println!("{json}"))
        .map_err(|e| format!("Failed to serialize rows: {}", e))
}

fn print_table(session: &SearchSession<MemoryGrid>, visible: &[VisibleRow<'_>], columns: &[Column]) {
    if visible.is_empty() {
        println!("{}", ResultSummary::format(0, "row"));
        return;
    }

    let plan = session.highlight_plan();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.iter().map(|c| c.title.as_str()).collect::<Vec<_>>());

    for v in visible {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let text = highlight_cell(plan.as_ref(), v.row.get(&column.field));
                if i == 0 {
                    format!("{}{}{}", "  ".repeat(v.depth()), tree_marker(v), text)
                } else {
                    text
                }
            })
            .collect();
        table.add_row(cells);
    }

    println!("{table}");
    println!("{}", ResultSummary::format(visible.len(), "row"));
}

fn tree_marker(v: &VisibleRow<'_>) -> &'static str {
    match (v.row.is_expandable(), v.expanded) {
        (false, _) => "",
        (true, true) => "▾ ",
        (true, false) => "▸ ",
    }
}
