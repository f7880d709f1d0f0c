//! メモリ上の行ツリーを検索するソース

use super::{scan_rows, Applied, DataSource, SourceFuture, Suggestion};
use crate::column::Column;
use crate::filter::{FilterSet, QuerySyntax};
use crate::row::Row;
use std::sync::Arc;

/// メモリ上の全データを走査するソース
pub struct LocalSource {
    rows: Arc<Vec<Row>>,
    syntax: QuerySyntax,
}

impl LocalSource {
    pub fn new(rows: impl Into<Arc<Vec<Row>>>, syntax: QuerySyntax) -> Self {
        Self {
            rows: rows.into(),
            syntax,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl DataSource for LocalSource {
    fn find_matches<'a>(
        &'a self,
        term: &'a str,
        columns: &'a [Column],
    ) -> SourceFuture<'a, Vec<Suggestion>> {
        let found = scan_rows(&self.rows, term, columns, self.syntax);
        Box::pin(async move { found })
    }

    fn apply<'a>(&'a self, filters: &'a FilterSet) -> SourceFuture<'a, Applied> {
        let applied = if filters.is_empty() {
            Applied::Clear
        } else {
            Applied::Filter(filters.clone())
        };
        Box::pin(async move { applied })
    }
}
