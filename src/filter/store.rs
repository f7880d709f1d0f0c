//! 検索状態の保持
//!
//! 現在の検索語とフィルタグループだけを持つ純粋なデータ。
//! グリッドや画面には一切触れない。

use super::FilterSet;

/// 検索語とフィルタ集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStore {
    search_term: String,
    filters: FilterSet,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// 検索語を丸ごと置き換える
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    pub fn clear_search_term(&mut self) {
        self.search_term.clear();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// フィルタ値を追加し、更新後の集合を返す
    pub fn add_value(&mut self, field: &str, value: &str, title: &str) -> &FilterSet {
        self.filters.add_value(field, value, title);
        &self.filters
    }

    /// フィルタ値を削除し、更新後の集合を返す
    pub fn remove_value(&mut self, field: &str, value: &str) -> &FilterSet {
        self.filters.remove_value(field, value);
        &self.filters
    }

    /// フィルタと検索語をすべてリセット
    pub fn clear(&mut self) {
        self.filters.clear();
        self.search_term.clear();
    }

    /// フィルタが1つもないか
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
