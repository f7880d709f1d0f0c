//! グリッドの行モデル
//!
//! 行は「フィールド名 → JSON値」のマップと、子行のリストを持つツリー。
//! 子行は親が所有し、逆参照や循環は存在しない。
//!
//! 入力データでは子行のキーが `children` と `_children` のどちらでも来るため、
//! デシリアライズ時に `children` に正規化する。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 子行として認識するキー（優先順）
const CHILDREN_KEYS: [&str; 2] = ["children", "_children"];

/// グリッドの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Row {
    data: Map<String, Value>,
    children: Vec<Row>,
}

impl Row {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    /// 子行を追加したRowを返す
    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self
    }

    /// フィールド値を取得
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// 文字列フィールドのみ取得（それ以外は None）
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn children(&self) -> &[Row] {
        &self.children
    }

    /// 子行を持つ（展開可能な）行かどうか
    pub fn is_expandable(&self) -> bool {
        !self.children.is_empty()
    }

    /// 指定パスの行を取得
    pub fn descendant(&self, path: &[usize]) -> Option<&Row> {
        path.iter()
            .try_fold(self, |row, &index| row.children.get(index))
    }
}

impl From<Map<String, Value>> for Row {
    fn from(mut data: Map<String, Value>) -> Self {
        // 配列を持つ最初のキーを採用する。どちらのキーもデータからは取り除く
        let mut children = None;
        for key in CHILDREN_KEYS {
            if let Some(Value::Array(items)) = data.remove(key) {
                if children.is_none() {
                    children = Some(items);
                }
            }
        }

        let children = match children {
            Some(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(Row::from(map)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Self { data, children }
    }
}

impl From<Row> for Map<String, Value> {
    fn from(row: Row) -> Self {
        let mut map = row.data;
        if !row.children.is_empty() {
            let children = row
                .children
                .into_iter()
                .map(|child| Value::Object(child.into()))
                .collect();
            map.insert("children".to_string(), Value::Array(children));
        }
        map
    }
}

/// ルート行リストからの位置（インデックスの列）
///
/// `[2, 0]` は3番目のルート行の最初の子行を指す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowPath(Vec<usize>);

impl RowPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// 子行のパスを返す
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// ルート行を深さ0とした深さ
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// ルート行リストから該当行を解決する
    pub fn resolve<'a>(&self, rows: &'a [Row]) -> Option<&'a Row> {
        let (first, rest) = self.0.split_first()?;
        rows.get(*first)?.descendant(rest)
    }
}

impl From<Vec<usize>> for RowPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for RowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
