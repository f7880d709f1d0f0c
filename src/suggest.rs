//! 候補値の検索
//!
//! ## 使い方
//!
//! ```ignore
//! let source = LocalSource::new(rows, QuerySyntax::Plain);
//! let found = source.find_matches("bob", &columns).await;
//! let grouped = Suggestions::from_flat(found);
//! ```
//!
//! データの取得元（メモリ上のツリー / リモート問い合わせ）は `DataSource` で抽象化する。
//! 使う側は取得元を意識せず `find_matches()` と `apply()` を呼ぶだけ。

mod local;
mod remote;

pub use local::LocalSource;
pub use remote::RemoteSource;

use crate::column::Column;
use crate::filter::{cell_text, FilterExpr, FilterSet, Operator, QuerySyntax};
use crate::row::Row;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// `DataSource` が返す Future
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 候補値 1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub field: String,
    pub title: String,
    /// データ中の値そのもの（正規化しない）
    pub value: String,
    pub operator: Operator,
}

impl Suggestion {
    /// フィルタとして保存する値
    ///
    /// `like` 以外は `"<op> <value>"` 形式。
    pub fn filter_value(&self) -> String {
        FilterExpr::new(self.operator, self.value.clone()).to_string()
    }
}

/// フィールド単位にまとめた候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionGroup {
    pub field: String,
    pub title: String,
    pub entries: Vec<Suggestion>,
}

/// 表示用にフィールドごとにまとめた候補一覧
///
/// グループは最初に現れた順、値はフィールド内で重複なし。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    groups: Vec<SuggestionGroup>,
}

impl Suggestions {
    pub fn from_flat(suggestions: Vec<Suggestion>) -> Self {
        let mut groups: Vec<SuggestionGroup> = Vec::new();

        for suggestion in suggestions {
            let index = match groups.iter().position(|g| g.field == suggestion.field) {
                Some(index) => index,
                None => {
                    groups.push(SuggestionGroup {
                        field: suggestion.field.clone(),
                        title: suggestion.title.clone(),
                        entries: Vec::new(),
                    });
                    groups.len() - 1
                }
            };

            let group = &mut groups[index];
            if !group.entries.iter().any(|e| e.value == suggestion.value) {
                group.entries.push(suggestion);
            }
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[SuggestionGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// フィルタ適用の結果
pub enum Applied {
    /// グリッド側で判定する（ローカル）
    Filter(FilterSet),
    /// フィルタ解除（ローカル）
    Clear,
    /// サーバー側で絞り込まれた行で置き換える（リモート）
    Replace(Vec<Row>),
    /// 取得に失敗。グリッドは変更しない
    Failed,
}

/// データ取得元の抽象化
///
/// 失敗は境界で空の結果に変換する。エラーを呼び出し側へ伝播させない。
pub trait DataSource: Send + Sync {
    /// 検索語に一致する候補値を探す
    fn find_matches<'a>(
        &'a self,
        term: &'a str,
        columns: &'a [Column],
    ) -> SourceFuture<'a, Vec<Suggestion>>;

    /// フィルタ集合を適用する
    fn apply<'a>(&'a self, filters: &'a FilterSet) -> SourceFuture<'a, Applied>;

    /// 問い合わせに必要な検索語の最小文字数
    fn min_term_length(&self) -> usize {
        0
    }
}

/// 行ツリーを再帰的に走査して候補値を集める
///
/// 列ごと（渡された順）に、値がフィールド内で重複しないように集める。
pub fn scan_rows(
    rows: &[Row],
    term: &str,
    columns: &[Column],
    syntax: QuerySyntax,
) -> Vec<Suggestion> {
    if term.is_empty() {
        return Vec::new();
    }

    let expr = syntax.parse(term);
    let allow_number = expr.operator().is_ordering();
    let mut results = Vec::new();

    for column in columns {
        let mut values: Vec<String> = Vec::new();
        collect_values(rows, &column.field, &expr, allow_number, &mut values);

        results.extend(values.into_iter().map(|value| Suggestion {
            field: column.field.clone(),
            title: column.title.clone(),
            value,
            operator: expr.operator(),
        }));
    }

    results
}

fn collect_values(
    rows: &[Row],
    field: &str,
    expr: &FilterExpr,
    allow_number: bool,
    values: &mut Vec<String>,
) {
    for row in rows {
        if let Some(text) = row.get(field).and_then(|v| cell_text(v, allow_number)) {
            if expr.evaluate(&text) && !values.iter().any(|v| *v == *text) {
                values.push(text.into_owned());
            }
        }
        collect_values(row.children(), field, expr, allow_number, values);
    }
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
