//! リモートエンドポイントに問い合わせるソース
//!
//! - 候補検索: 追加パラメータ + `search` + `columns[]`（POST はフォーム、GET はクエリ）
//! - フィルタ適用: `GET url` に追加パラメータ + `filters`（JSON文字列）
//! - 応答は `{ "results": [行...] }`

use super::{scan_rows, Applied, DataSource, SourceFuture, Suggestion};
use crate::column::{text_only_columns, Column};
use crate::config::{HttpConfig, HttpMethod, RemoteConfig};
use crate::error::{Result, SiftError};
use crate::filter::{FilterSet, QuerySyntax};
use crate::row::Row;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// 問い合わせ結果
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Row>,
}

/// HTTP経由で候補検索・フィルタ適用を行うソース
pub struct RemoteSource {
    client: Client,
    config: RemoteConfig,
    syntax: QuerySyntax,
}

impl RemoteSource {
    pub fn new(config: RemoteConfig, http: &HttpConfig, syntax: QuerySyntax) -> Self {
        Self {
            client: http.build_client(),
            config,
            syntax,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// 候補検索（エラーをそのまま返す版）
    pub async fn try_find_matches(
        &self,
        term: &str,
        columns: &[Column],
    ) -> Result<Vec<Suggestion>> {
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let columns = text_only_columns(columns);
        let mut params = self.base_params();
        params.push(("search".to_string(), term.to_string()));
        params.extend(
            columns
                .iter()
                .map(|c| ("columns[]".to_string(), c.field.clone())),
        );

        let url = self.config.suggestion_url();
        debug!("suggestion query: {} {:?} search={:?}", url, self.config.method, term);

        let request = match self.config.method {
            HttpMethod::Get => self.client.get(url).query(&params),
            HttpMethod::Post => self.client.post(url).form(&params),
        };

        let rows = self.send(request).await?;
        Ok(scan_rows(&rows, term, &columns, self.syntax))
    }

    /// フィルタ済みの行を取得（フィルタが空なら全件）
    pub async fn try_fetch_rows(&self, filters: &FilterSet) -> Result<Vec<Row>> {
        let mut params = self.base_params();
        if !filters.is_empty() {
            params.push(("filters".to_string(), serde_json::to_string(&filters.to_wire())?));
        }

        debug!("filter query: {} filters={}", self.config.url, filters.len());

        let request = self.client.get(&self.config.url).query(&params);
        self.send(request).await
    }

    fn base_params(&self) -> Vec<(String, String)> {
        self.config
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// 問い合わせを送る。リトライ可能なエラーなら1回だけ再送する
    async fn send(&self, request: RequestBuilder) -> Result<Vec<Row>> {
        let retry = request.try_clone();
        match self.send_once(request).await {
            Err(e) if e.is_retryable() => match retry {
                Some(request) => {
                    warn!("remote query failed, retrying once: {}", e);
                    self.send_once(request).await
                }
                None => Err(e),
            },
            result => result,
        }
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<Vec<Row>> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SiftError::RemoteStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| SiftError::InvalidResponse(e.to_string()))?;

        Ok(parsed.results)
    }
}

impl DataSource for RemoteSource {
    fn find_matches<'a>(
        &'a self,
        term: &'a str,
        columns: &'a [Column],
    ) -> SourceFuture<'a, Vec<Suggestion>> {
        Box::pin(async move {
            match self.try_find_matches(term, columns).await {
                Ok(found) => found,
                Err(e) => {
                    warn!("suggestion query failed: {}", e);
                    Vec::new()
                }
            }
        })
    }

    fn apply<'a>(&'a self, filters: &'a FilterSet) -> SourceFuture<'a, Applied> {
        Box::pin(async move {
            match self.try_fetch_rows(filters).await {
                Ok(rows) => Applied::Replace(rows),
                Err(e) => {
                    warn!("filter query failed: {}", e);
                    Applied::Failed
                }
            }
        })
    }

    fn min_term_length(&self) -> usize {
        self.config.min_characters
    }
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
