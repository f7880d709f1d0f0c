//! セル表示文字列のハイライト
//!
//! フィルタ値（と、設定によっては入力中の検索語）に一致する部分を
//! マーカーで囲む。一致は大文字小文字を無視したリテラル一致（正規表現としては解釈しない）。
//!
//! 複数の語の一致範囲が重なる場合は、元の文字列上で範囲を結合してから1回だけ囲む。
//! 挿入したマーカー文字列が後続の語に再度一致することはない。

use crate::filter::{FilterSet, QuerySyntax};
use log::warn;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// ハイライトの開始・終了マーカー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub open: String,
    pub close: String,
}

impl Marker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(r#"<span class="search-highlight">"#, "</span>")
    }
}

/// ハイライト対象の語
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightMode {
    /// フィルタ値のみ
    Filters,
    /// フィルタ値と入力中の検索語
    #[default]
    FiltersAndTerm,
}

/// 分割された表示文字列の一部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// ハイライト処理
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighter {
    marker: Marker,
    mode: HighlightMode,
    syntax: QuerySyntax,
}

impl Highlighter {
    pub fn new(marker: Marker, mode: HighlightMode, syntax: QuerySyntax) -> Self {
        Self {
            marker,
            mode,
            syntax,
        }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// 現在のフィルタ状態からハイライト計画を作る
    ///
    /// フィルタも検索語もなければ None（何もしない）。
    pub fn plan(&self, filters: &FilterSet, term: &str) -> Option<HighlightPlan> {
        if filters.is_empty() && term.is_empty() {
            return None;
        }

        let mut terms: Vec<String> = Vec::new();
        let mut push = |input: &str| {
            let expr = self.syntax.parse(input);
            if !expr.operator().highlights() || expr.operand().is_empty() {
                return;
            }
            if !terms.iter().any(|t| t == expr.operand()) {
                terms.push(expr.operand().to_string());
            }
        };

        for value in filters.distinct_values() {
            push(value);
        }
        if self.mode == HighlightMode::FiltersAndTerm && !term.is_empty() {
            push(term);
        }

        let patterns = terms
            .iter()
            .filter_map(|t| {
                RegexBuilder::new(&regex::escape(t))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| warn!("highlight pattern skipped: {}", e))
                    .ok()
            })
            .collect();

        Some(HighlightPlan {
            patterns,
            marker: self.marker.clone(),
        })
    }

    /// セル値をハイライトする
    ///
    /// 文字列以外、または変更がない場合は入力をそのまま（借用で）返す。
    pub fn render<'a>(&self, cell: &'a Value, filters: &FilterSet, term: &str) -> Cow<'a, Value> {
        let Value::String(text) = cell else {
            return Cow::Borrowed(cell);
        };
        let Some(plan) = self.plan(filters, term) else {
            return Cow::Borrowed(cell);
        };

        match plan.apply(text) {
            Cow::Borrowed(_) => Cow::Borrowed(cell),
            Cow::Owned(marked) => Cow::Owned(Value::String(marked)),
        }
    }
}

/// コンパイル済みのハイライト計画
///
/// 1回の再描画で全セルに使い回す。
#[derive(Debug, Clone)]
pub struct HighlightPlan {
    patterns: Vec<Regex>,
    marker: Marker,
}

impl HighlightPlan {
    /// 一致範囲（結合済み、昇順）
    pub fn ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let mut ranges: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start < last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    /// 文字列をハイライト部分とそれ以外に分割する
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (start, end) in self.ranges(text) {
            if start > cursor {
                segments.push(Segment {
                    text: &text[cursor..start],
                    highlighted: false,
                });
            }
            segments.push(Segment {
                text: &text[start..end],
                highlighted: true,
            });
            cursor = end;
        }

        if cursor < text.len() {
            segments.push(Segment {
                text: &text[cursor..],
                highlighted: false,
            });
        }
        segments
    }

    /// マーカーで囲んだ文字列を返す（一致なしなら借用のまま）
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let segments = self.segments(text);
        if !segments.iter().any(|s| s.highlighted) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len() + segments.len() * 16);
        for segment in segments {
            if segment.highlighted {
                out.push_str(&self.marker.open);
                out.push_str(segment.text);
                out.push_str(&self.marker.close);
            } else {
                out.push_str(segment.text);
            }
        }
        Cow::Owned(out)
    }
}

#[cfg(test)]
#[path = "highlight_test.rs"]
mod tests;
