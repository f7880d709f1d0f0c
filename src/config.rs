//! 設定ファイル（gridsift.toml）とHTTP設定
//!
//! ```toml
//! [search]
//! syntax = "operators"
//! highlight = "filters-and-term"
//! auto_search_delay_ms = 1500
//!
//! [search.marker]
//! open = "<mark>"
//! close = "</mark>"
//!
//! [remote]
//! url = "https://example.com/api/items/"
//! method = "GET"
//! min_characters = 3
//!
//! [remote.params]
//! page_size = "50"
//!
//! [http]
//! timeout_secs = 10
//! ```

use crate::error::Result;
use crate::filter::QuerySyntax;
use crate::highlight::{HighlightMode, Marker};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// 設定ファイルのルート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchConfig,
    pub remote: Option<RemoteConfig>,
    pub http: HttpConfig,
}

impl Settings {
    /// ファイルから読み込む
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// パス未指定ならデフォルト値
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// 検索・ハイライトの挙動
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub syntax: QuerySyntax,
    pub highlight: HighlightMode,
    pub marker: Marker,
    /// ローカル検索で問い合わせに必要な最小文字数
    pub min_characters: usize,
    /// 入力が止まってから自動検索するまでの待ち時間（ミリ秒）
    pub auto_search_delay_ms: u64,
    /// 入力中インジケータを出すまでの待ち時間（ミリ秒）
    pub typing_indicator_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            syntax: QuerySyntax::Plain,
            highlight: HighlightMode::FiltersAndTerm,
            marker: Marker::default(),
            min_characters: 0,
            auto_search_delay_ms: 2000,
            typing_indicator_delay_ms: 500,
        }
    }
}

impl SearchConfig {
    pub fn auto_search_delay(&self) -> Duration {
        Duration::from_millis(self.auto_search_delay_ms)
    }

    pub fn typing_indicator_delay(&self) -> Duration {
        Duration::from_millis(self.typing_indicator_delay_ms)
    }
}

/// リモート問い合わせのHTTPメソッド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

/// リモートエンドポイント設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// 行データ取得（フィルタ適用）のURL
    pub url: String,
    /// 候補検索のURL（未指定なら `url`）
    #[serde(default)]
    pub suggestion_url: Option<String>,
    /// 候補検索のメソッド。フィルタ適用は常に GET
    #[serde(default)]
    pub method: HttpMethod,
    /// 問い合わせに必要な検索語の最小文字数
    #[serde(default = "default_remote_min_characters")]
    pub min_characters: usize,
    /// すべての問い合わせに付与する追加パラメータ
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

fn default_remote_min_characters() -> usize {
    3
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            suggestion_url: None,
            method: HttpMethod::default(),
            min_characters: default_remote_min_characters(),
            params: BTreeMap::new(),
        }
    }

    pub fn suggestion_url(&self) -> &str {
        self.suggestion_url.as_deref().unwrap_or(&self.url)
    }
}

/// HTTP設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// タイムアウト（秒）
    pub timeout_secs: Option<u64>,
    /// User-Agent
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(30),
            user_agent: "gridsift".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
