//! 行の一致判定
//!
//! - フィールド間は AND、同一フィールドの値同士は OR
//! - 行自身が一致しなくても、子孫行（任意の深さ）が一致すれば一致とみなす
//! - 値が無い・文字列でないフィールドは不一致（順序比較の演算子のみ数値を受け付ける）
//! - 副作用なし。パニックしない

use super::operator::contains_ignore_case;
use super::{FilterSet, QuerySyntax};
use crate::row::Row;
use serde_json::Value;
use std::borrow::Cow;

/// グリッドに渡すフィルタ関数
pub type RowPredicate = Box<dyn Fn(&Row) -> bool + Send + Sync>;

/// フィルタ集合に対する行の一致判定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    syntax: QuerySyntax,
}

impl Matcher {
    pub fn new(syntax: QuerySyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> QuerySyntax {
        self.syntax
    }

    /// 行自身または子孫行のいずれかがフィルタを満たすか
    ///
    /// フィルタ集合が空なら常に true（呼び出し側で「フィルタなし」として扱うこと）。
    pub fn matches(&self, row: &Row, filters: &FilterSet) -> bool {
        self.matches_directly(row, filters) || self.any_child_matches(row, filters)
    }

    /// 直下の子行のいずれかが（子孫込みで）一致するか。行自身は含めない
    pub fn any_child_matches(&self, row: &Row, filters: &FilterSet) -> bool {
        row.children()
            .iter()
            .any(|child| self.matches(child, filters))
    }

    /// 行自身のフィールドだけでフィルタを満たすか
    pub fn matches_directly(&self, row: &Row, filters: &FilterSet) -> bool {
        filters.groups().all(|group| {
            let Some(actual) = row.get(group.field()) else {
                return false;
            };
            group
                .values()
                .iter()
                .any(|value| self.value_matches(actual, value))
        })
    }

    /// 1つのセル値が1つのフィルタ値を満たすか
    pub fn value_matches(&self, actual: &Value, filter_value: &str) -> bool {
        match self.syntax {
            QuerySyntax::Plain => actual
                .as_str()
                .is_some_and(|s| contains_ignore_case(s, filter_value)),
            QuerySyntax::Operators => {
                let expr = self.syntax.parse(filter_value);
                cell_text(actual, expr.operator().is_ordering())
                    .is_some_and(|s| expr.evaluate(&s))
            }
        }
    }

    /// フィルタ集合を所有する判定関数を作る
    pub fn predicate(&self, filters: FilterSet) -> RowPredicate {
        let matcher = *self;
        Box::new(move |row| matcher.matches(row, &filters))
    }
}

/// 比較に使うセルの文字列表現
///
/// 文字列はそのまま。数値は `allow_number` のときだけ JSON 表記で返す。
pub(crate) fn cell_text(value: &Value, allow_number: bool) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) if allow_number => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
