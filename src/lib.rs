//! gridsift: 階層データグリッド向けのインクリメンタル検索・フィルタ・ハイライト
//!
//! - `filter`: フィルタ状態と行の一致判定
//! - `suggest`: 入力中の候補値検索（ローカル / リモート）
//! - `tree`: フィルタに合わせたツリーの展開
//! - `highlight`: セル文字列のハイライト
//! - `session`: 上記をまとめる検索セッション

pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod highlight;
pub mod row;
pub mod schedule;
pub mod session;
pub mod suggest;
pub mod tree;

pub use error::{Result, SiftError};
