//! フィルタ状態と判定ロジック
//!
//! - `store`: 検索語とフィルタグループの保持
//! - `operator`: 比較演算子と `"<op> <value>"` 構文
//! - `matcher`: 行（と子孫行）の一致判定

mod matcher;
mod operator;
mod store;

pub use matcher::{Matcher, RowPredicate};
pub(crate) use matcher::cell_text;
pub use operator::{FilterExpr, Operator};
pub use store::FilterStore;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// フィルタ値・検索語の解釈方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuerySyntax {
    /// 値をそのまま部分一致（大文字小文字無視）で扱う
    #[default]
    Plain,
    /// 値を `"<op> <value>"` としてパースする
    Operators,
}

impl QuerySyntax {
    /// 入力文字列をこの構文で式に変換する
    pub fn parse(self, input: &str) -> FilterExpr {
        match self {
            QuerySyntax::Plain => FilterExpr::like(input),
            QuerySyntax::Operators => FilterExpr::parse(input),
        }
    }
}

/// 1フィールド分のフィルタ
///
/// 値は挿入順・重複なし。値が空になったグループは存在しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterGroup {
    field: String,
    title: String,
    values: Vec<String>,
}

impl FilterGroup {
    fn new(field: &str, title: &str) -> Self {
        Self {
            field: field.to_string(),
            title: title.to_string(),
            values: Vec::new(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// リモートへ送るフィルタの形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFilter {
    pub field: String,
    pub values: Vec<String>,
}

/// 有効なフィルタグループの集合（フィールド名 → グループ）
///
/// 反復順はグループの作成順。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    groups: IndexMap<String, FilterGroup>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を追加する（グループがなければ `title` で作成）
    pub fn add_value(&mut self, field: &str, value: &str, title: &str) {
        let group = self
            .groups
            .entry(field.to_string())
            .or_insert_with(|| FilterGroup::new(field, title));

        if !group.contains(value) {
            group.values.push(value.to_string());
        }
    }

    /// 値を削除する（空になったグループは削除）
    pub fn remove_value(&mut self, field: &str, value: &str) {
        let Some(group) = self.groups.get_mut(field) else {
            return;
        };

        group.values.retain(|v| v != value);

        if group.values.is_empty() {
            self.groups.shift_remove(field);
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, field: &str) -> Option<&FilterGroup> {
        self.groups.get(field)
    }

    pub fn groups(&self) -> impl Iterator<Item = &FilterGroup> {
        self.groups.values()
    }

    /// 全グループの値を重複なしで列挙（グループ順・挿入順）
    pub fn distinct_values(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for value in self.groups().flat_map(|g| g.values.iter()) {
            if !seen.contains(&value.as_str()) {
                seen.push(value);
            }
        }
        seen
    }

    /// リモート送信用の形式に変換
    pub fn to_wire(&self) -> Vec<WireFilter> {
        self.groups()
            .map(|g| WireFilter {
                field: g.field.clone(),
                values: g.values.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "filter/set_test.rs"]
mod set_tests;

#[cfg(test)]
#[path = "filter/proptests.rs"]
mod proptests;
