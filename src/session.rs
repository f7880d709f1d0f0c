//! 検索セッション（入力 → 候補 → フィルタ適用 → 再描画の流れをまとめる）
//!
//! 非同期処理は3段階に分ける。
//!
//! 1. `begin_*`: 同期。状態を読み取り、世代チケットを発行する
//! 2. `run()`: 必要なものをすべて所有した `'static` な Future
//! 3. `finish_*`: 同期。古いチケットの結果は捨てる
//!
//! これにより複数の要求が並行しても、最後に発行したものだけが反映される。
//!
//! 入力ごとに `type_text` を呼ぶと、入力が止まった時点で自動検索が走り、
//! 進行は `SearchEvent` としてチャネルに届く。
//!
//! ```ignore
//! let mut session = SearchSession::new(grid, source, columns, &config);
//! session.input("bob");
//! if let SuggestOutcome::Ready(found) = session.search().await {
//!     let first = found.iter().next().cloned();
//!     ...
//! }
//! ```

use crate::column::{searchable_columns, Column};
use crate::config::SearchConfig;
use crate::filter::{FilterSet, FilterStore, Matcher};
use crate::grid::Grid;
use crate::highlight::{HighlightPlan, Highlighter};
use crate::schedule::{Debouncer, Generation, Ticket};
use crate::suggest::{Applied, DataSource, Suggestion, Suggestions};
use crate::tree::recompute_visibility;
use log::debug;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// 入力直後の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// 検索語が空
    Idle,
    /// 検索語が最小文字数に満たない
    TooShort { required: usize },
    /// 検索可能
    Ready,
}

/// 候補検索の開始結果
pub enum SearchStart {
    Idle,
    TooShort { required: usize },
    Pending(PendingSearch),
}

/// 候補検索の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    Ready(Suggestions),
    /// より新しい検索が発行済み
    Superseded,
}

/// フィルタ適用の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// グリッドに判定関数を設定した
    Filtered,
    /// フィルタを解除した
    Cleared,
    /// 行データを置き換えた
    Replaced { rows: usize },
    /// 取得に失敗（グリッドは変更していない）
    Failed,
    /// より新しい適用が発行済み
    Superseded,
}

/// 自動検索の進行
pub enum SearchEvent {
    /// 入力が少し止まった。`remaining` 後に自動検索する
    Waiting { term: String, remaining: Duration },
    /// 自動検索を開始した
    Searching { term: String },
    /// 自動検索が完了した（`finish_search` に渡す）
    Completed(CompletedSearch),
}

/// 実行待ちの候補検索
pub struct PendingSearch {
    source: Arc<dyn DataSource>,
    columns: Arc<[Column]>,
    term: String,
    ticket: Ticket,
}

impl PendingSearch {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub async fn run(self) -> CompletedSearch {
        let found = self.source.find_matches(&self.term, &self.columns).await;
        CompletedSearch {
            ticket: self.ticket,
            found,
        }
    }
}

/// 完了した候補検索
pub struct CompletedSearch {
    ticket: Ticket,
    found: Vec<Suggestion>,
}

/// 実行待ちのフィルタ適用
pub struct PendingApply {
    source: Arc<dyn DataSource>,
    filters: FilterSet,
    ticket: Ticket,
}

impl PendingApply {
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub async fn run(self) -> CompletedApply {
        let applied = self.source.apply(&self.filters).await;
        CompletedApply {
            ticket: self.ticket,
            filters: self.filters,
            applied,
        }
    }
}

/// 完了したフィルタ適用
pub struct CompletedApply {
    ticket: Ticket,
    filters: FilterSet,
    applied: Applied,
}

/// 検索セッション
pub struct SearchSession<G: Grid> {
    store: FilterStore,
    grid: G,
    source: Arc<dyn DataSource>,
    columns: Arc<[Column]>,
    matcher: Matcher,
    highlighter: Highlighter,
    min_characters: usize,
    auto_search: Debouncer,
    typing_indicator: Debouncer,
    searches: Generation,
    applies: Generation,
}

impl<G: Grid> SearchSession<G> {
    /// セッションを作る
    ///
    /// 列は検索対象外（`actions`、日付・数値・真偽値）を除いて保持する。
    pub fn new(
        grid: G,
        source: Arc<dyn DataSource>,
        columns: &[Column],
        config: &SearchConfig,
    ) -> Self {
        let min_characters = config.min_characters.max(source.min_term_length());

        Self {
            store: FilterStore::new(),
            grid,
            source,
            columns: searchable_columns(columns).into(),
            matcher: Matcher::new(config.syntax),
            highlighter: Highlighter::new(config.marker.clone(), config.highlight, config.syntax),
            min_characters,
            auto_search: Debouncer::new(config.auto_search_delay()),
            typing_indicator: Debouncer::new(config.typing_indicator_delay()),
            searches: Generation::new(),
            applies: Generation::new(),
        }
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn min_characters(&self) -> usize {
        self.min_characters
    }

    /// 入力が止まってから自動検索するまでの待ち時間
    pub fn auto_search_delay(&self) -> Duration {
        self.auto_search.delay()
    }

    /// 入力が止まってから待機表示を出すまでの待ち時間
    pub fn typing_indicator_delay(&self) -> Duration {
        self.typing_indicator.delay()
    }

    /// 自動検索が予約されているか
    pub fn is_auto_search_pending(&self) -> bool {
        self.auto_search.is_pending()
    }

    /// 検索語を更新する
    pub fn input(&mut self, text: &str) -> InputState {
        self.store.set_search_term(text);
        self.input_state()
    }

    /// 検索語を更新し、入力が止まったら自動で候補検索する
    ///
    /// 検索可能な検索語なら `typing_indicator_delay` 後に `Waiting`、
    /// `auto_search_delay` 後に `Searching` と `Completed` を `events` に送る。
    /// 次の入力・Escape・明示的な検索で予約は取り消される。
    /// Tokio ランタイム上で呼ぶこと。
    pub fn type_text(&mut self, text: &str, events: &UnboundedSender<SearchEvent>) -> InputState {
        let state = self.input(text);
        let SearchStart::Pending(pending) = self.begin_search() else {
            return state;
        };

        let auto_search_delay = self.auto_search.delay();
        let indicator_delay = self.typing_indicator.delay();
        if indicator_delay < auto_search_delay {
            let tx = events.clone();
            let term = pending.term().to_string();
            let remaining = auto_search_delay - indicator_delay;
            self.typing_indicator.schedule(async move {
                let _ = tx.send(SearchEvent::Waiting { term, remaining });
            });
        }

        let tx = events.clone();
        self.auto_search.schedule(async move {
            let term = pending.term().to_string();
            debug!("auto search term={:?}", term);
            let _ = tx.send(SearchEvent::Searching { term });
            let _ = tx.send(SearchEvent::Completed(pending.run().await));
        });
        state
    }

    /// 予約中の自動検索と待機表示を取り消す
    fn cancel_timers(&mut self) {
        self.auto_search.cancel();
        self.typing_indicator.cancel();
    }

    /// 検索語をクリアする（フィルタは残す）
    pub fn escape(&mut self) {
        self.store.clear_search_term();
        self.cancel_timers();
        self.searches.invalidate();
    }

    fn input_state(&self) -> InputState {
        let length = self.store.search_term().chars().count();
        if length == 0 {
            InputState::Idle
        } else if length < self.min_characters {
            InputState::TooShort {
                required: self.min_characters,
            }
        } else {
            InputState::Ready
        }
    }

    /// 現在の検索語で候補検索を開始する
    ///
    /// 検索しない場合も世代を進め、実行中の古い検索結果を無効にする。
    /// 予約中の自動検索は取り消す。
    pub fn begin_search(&mut self) -> SearchStart {
        self.cancel_timers();
        match self.input_state() {
            InputState::Idle => {
                self.searches.invalidate();
                SearchStart::Idle
            }
            InputState::TooShort { required } => {
                self.searches.invalidate();
                SearchStart::TooShort { required }
            }
            InputState::Ready => {
                let ticket = self.searches.issue();
                debug!("search #{} term={:?}", ticket.id(), self.store.search_term());
                SearchStart::Pending(PendingSearch {
                    source: Arc::clone(&self.source),
                    columns: Arc::clone(&self.columns),
                    term: self.store.search_term().to_string(),
                    ticket,
                })
            }
        }
    }

    /// 候補検索の結果を受け取る
    pub fn finish_search(&mut self, done: CompletedSearch) -> SuggestOutcome {
        if !done.ticket.is_current() {
            debug!("search #{} superseded", done.ticket.id());
            return SuggestOutcome::Superseded;
        }
        SuggestOutcome::Ready(Suggestions::from_flat(done.found))
    }

    /// 候補検索を開始から反映まで行う
    ///
    /// 検索語が空または短すぎる場合は空の候補を返す。
    pub async fn search(&mut self) -> SuggestOutcome {
        match self.begin_search() {
            SearchStart::Idle | SearchStart::TooShort { .. } => {
                SuggestOutcome::Ready(Suggestions::default())
            }
            SearchStart::Pending(pending) => {
                let done = pending.run().await;
                self.finish_search(done)
            }
        }
    }

    /// 候補を選択する（フィルタ値を追加し、検索語をクリア）
    pub fn select(&mut self, suggestion: &Suggestion) -> PendingApply {
        self.store.add_value(
            &suggestion.field,
            &suggestion.filter_value(),
            &suggestion.title,
        );
        self.escape();
        self.begin_apply()
    }

    /// フィルタ値を直接追加する（検索語はそのまま）
    pub fn add_filter(&mut self, field: &str, value: &str, title: &str) -> PendingApply {
        self.store.add_value(field, value, title);
        self.begin_apply()
    }

    /// フィルタ値を1つ外す
    pub fn remove_filter(&mut self, field: &str, value: &str) -> PendingApply {
        self.store.remove_value(field, value);
        self.begin_apply()
    }

    /// フィルタと検索語をすべてリセットする
    pub fn reset(&mut self) -> PendingApply {
        self.store.clear();
        self.cancel_timers();
        self.searches.invalidate();
        self.begin_apply()
    }

    /// 現在のフィルタ集合の適用を開始する
    pub fn begin_apply(&mut self) -> PendingApply {
        let ticket = self.applies.issue();
        debug!("apply #{} filters={}", ticket.id(), self.store.filters().len());
        PendingApply {
            source: Arc::clone(&self.source),
            filters: self.store.filters().clone(),
            ticket,
        }
    }

    /// フィルタ適用の結果をグリッドに反映する
    pub fn finish_apply(&mut self, done: CompletedApply) -> ApplyOutcome {
        if !done.ticket.is_current() {
            debug!("apply #{} superseded", done.ticket.id());
            return ApplyOutcome::Superseded;
        }

        let outcome = match done.applied {
            Applied::Filter(filters) => {
                self.grid.set_filter(self.matcher.predicate(filters));
                ApplyOutcome::Filtered
            }
            Applied::Clear => {
                self.grid.clear_filter();
                ApplyOutcome::Cleared
            }
            Applied::Replace(rows) => {
                let count = rows.len();
                self.grid.set_data(rows);
                ApplyOutcome::Replaced { rows: count }
            }
            Applied::Failed => return ApplyOutcome::Failed,
        };

        self.grid.redraw();
        recompute_visibility(&mut self.grid, &self.matcher, &done.filters);
        outcome
    }

    /// フィルタ適用を開始から反映まで行う
    pub async fn apply(&mut self, pending: PendingApply) -> ApplyOutcome {
        let done = pending.run().await;
        self.finish_apply(done)
    }

    /// セル値を現在の状態でハイライトする
    pub fn render_cell<'a>(&self, cell: &'a Value) -> Cow<'a, Value> {
        self.highlighter
            .render(cell, self.store.filters(), self.store.search_term())
    }

    /// 現在の状態のハイライト計画（再描画ごとに1回作って使い回す）
    pub fn highlight_plan(&self) -> Option<HighlightPlan> {
        self.highlighter
            .plan(self.store.filters(), self.store.search_term())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
