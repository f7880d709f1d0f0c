//! 列メタデータと検索対象列の選別
//!
//! 検索対象の判定は呼び出し側のポリシー。エンジン本体は渡された列だけを走査する。

use serde::{Deserialize, Serialize};

/// 自由入力検索から除外する列データ型
const NON_TEXT_TYPES: [&str; 7] = [
    "date", "datetime", "time", "integer", "float", "numeric", "boolean",
];

/// リモート問い合わせでテキスト列として扱う列データ型
const TEXT_TYPES: [&str; 4] = ["text", "string", "varchar", "char"];

/// アクション列のフィールド名
const ACTIONS_FIELD: &str = "actions";

/// 列定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub field: String,
    pub title: String,
    #[serde(
        default,
        rename = "dataType",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_type: Option<String>,
}

impl Column {
    pub fn new(field: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: title.into(),
            data_type: None,
        }
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// 自由入力検索の対象にできる列か
    pub fn is_searchable(&self) -> bool {
        if self.field == ACTIONS_FIELD {
            return false;
        }
        !self.data_type_in(&NON_TEXT_TYPES)
    }

    /// テキスト型（または型未指定）の列か
    pub fn is_text_only(&self) -> bool {
        match self.data_type {
            None => true,
            Some(_) => self.data_type_in(&TEXT_TYPES),
        }
    }

    fn data_type_in(&self, types: &[&str]) -> bool {
        self.data_type
            .as_deref()
            .is_some_and(|t| types.contains(&t.to_lowercase().as_str()))
    }
}

/// 自由入力検索の対象列を抽出する
pub fn searchable_columns(columns: &[Column]) -> Vec<Column> {
    columns.iter().filter(|c| c.is_searchable()).cloned().collect()
}

/// リモート問い合わせに渡すテキスト列を抽出する
pub fn text_only_columns(columns: &[Column]) -> Vec<Column> {
    columns.iter().filter(|c| c.is_text_only()).cloned().collect()
}
