//! 入力データ（ファイル / リモート）と設定の読み込み
//!
//! データファイルは JSON。行の配列、または `{ "columns": [...], "rows": [...] }`。
//! 列定義がなければ行のキー（子行を含む、出現順）から作る。

use crate::cli::GlobalArgs;
use gridsift::column::Column;
use gridsift::config::{RemoteConfig, Settings};
use gridsift::row::Row;
use gridsift::suggest::{DataSource, LocalSource, RemoteSource};
use gridsift::SiftError;
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// データ取得元の指定
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// JSON data file (array of rows or {"columns": [...], "rows": [...]})
    #[arg(long, value_name = "FILE", conflicts_with = "remote")]
    pub data: Option<PathBuf>,

    /// Remote endpoint URL (overrides [remote] url in the config file)
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Column definition as field[:title[:type]] (repeatable)
    #[arg(long = "column", value_name = "SPEC", value_parser = parse_column)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataFile {
    Table {
        #[serde(default)]
        columns: Vec<Column>,
        rows: Vec<Row>,
    },
    Rows(Vec<Row>),
}

/// 読み込み済みの入力
pub struct Loaded {
    pub settings: Settings,
    pub rows: Vec<Row>,
    pub columns: Vec<Column>,
    pub source: Arc<dyn DataSource>,
    pub remote: bool,
}

/// 設定とデータ取得元を読み込む
pub fn load(global: &GlobalArgs, args: &SourceArgs) -> Result<Loaded, String> {
    let mut settings = Settings::load(global.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(syntax) = global.syntax {
        settings.search.syntax = syntax;
    }
    let syntax = settings.search.syntax;

    if let Some(path) = &args.data {
        let (file_columns, rows) = read_data_file(path).map_err(|e| e.to_string())?;
        let columns = if !args.columns.is_empty() {
            args.columns.clone()
        } else if !file_columns.is_empty() {
            file_columns
        } else {
            infer_columns(&rows)
        };

        let source = Arc::new(LocalSource::new(rows.clone(), syntax));
        return Ok(Loaded {
            settings,
            rows,
            columns,
            source,
            remote: false,
        });
    }

    let remote = match (&args.remote, &settings.remote) {
        (Some(url), Some(config)) => RemoteConfig {
            url: url.clone(),
            ..config.clone()
        },
        (Some(url), None) => RemoteConfig::new(url.clone()),
        (None, Some(config)) => config.clone(),
        (None, None) => {
            return Err(SiftError::InvalidArgument(
                "either --data or --remote (or [remote] in the config file) is required".to_string(),
            )
            .to_string())
        }
    };

    let source = Arc::new(RemoteSource::new(remote, &settings.http, syntax));
    Ok(Loaded {
        settings,
        rows: Vec::new(),
        columns: args.columns.clone(),
        source,
        remote: true,
    })
}

fn read_data_file(path: &Path) -> Result<(Vec<Column>, Vec<Row>), SiftError> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<DataFile>(&content)? {
        DataFile::Table { columns, rows } => Ok((columns, rows)),
        DataFile::Rows(rows) => Ok((Vec::new(), rows)),
    }
}

/// 行のキーから列定義を作る（タイトルはフィールド名）
pub fn infer_columns(rows: &[Row]) -> Vec<Column> {
    let mut fields = IndexSet::new();
    collect_fields(rows, &mut fields);
    fields
        .into_iter()
        .map(|field| Column::new(field.clone(), field))
        .collect()
}

fn collect_fields(rows: &[Row], fields: &mut IndexSet<String>) {
    for row in rows {
        for key in row.data().keys() {
            if !fields.contains(key) {
                fields.insert(key.clone());
            }
        }
        collect_fields(row.children(), fields);
    }
}

/// `field[:title[:type]]` をパースする
pub fn parse_column(spec: &str) -> Result<Column, SiftError> {
    let mut parts = spec.splitn(3, ':');
    let field = parts.next().unwrap_or_default().trim();
    if field.is_empty() {
        return Err(SiftError::InvalidArgument(format!(
            "column '{}': field is empty",
            spec
        )));
    }

    let title = parts
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(field);
    let column = Column::new(field, title);

    match parts.next().map(str::trim).filter(|t| !t.is_empty()) {
        Some(data_type) => Ok(column.with_data_type(data_type)),
        None => Ok(column),
    }
}
