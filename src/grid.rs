//! グリッドウィジェットの抽象化とメモリ実装
//!
//! エンジンはグリッドの描画を持たない。`Grid` を通して
//! フィルタ関数の設定・データ差し替え・展開操作を依頼するだけ。

use crate::filter::RowPredicate;
use crate::row::{Row, RowPath};
use crate::tree::TreeView;
use std::collections::HashSet;

/// グリッドウィジェット
pub trait Grid: TreeView {
    /// 表示行の判定関数を設定する
    fn set_filter(&mut self, predicate: RowPredicate);

    /// 判定関数を解除する
    fn clear_filter(&mut self);

    /// 行データを丸ごと置き換える
    fn set_data(&mut self, rows: Vec<Row>);

    /// 再描画を要求する
    fn redraw(&mut self);
}

/// 表示中の行
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow<'a> {
    pub path: RowPath,
    pub row: &'a Row,
    pub expanded: bool,
}

impl VisibleRow<'_> {
    pub fn depth(&self) -> usize {
        self.path.depth()
    }
}

/// メモリ上のグリッド
///
/// 各階層で判定関数を通った行を表示し、展開された行の子を続けて表示する。
#[derive(Default)]
pub struct MemoryGrid {
    rows: Vec<Row>,
    expanded: HashSet<RowPath>,
    filter: Option<RowPredicate>,
    redraws: usize,
}

impl MemoryGrid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn is_expanded(&self, path: &RowPath) -> bool {
        self.expanded.contains(path)
    }

    /// 展開されている行のパス（昇順）
    pub fn expanded_paths(&self) -> Vec<RowPath> {
        let mut paths: Vec<RowPath> = self.expanded.iter().cloned().collect();
        paths.sort();
        paths
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// 現在表示される行（表示順）
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut visible = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            self.collect_visible(row, RowPath::root(index), &mut visible);
        }
        visible
    }

    fn collect_visible<'a>(&self, row: &'a Row, path: RowPath, visible: &mut Vec<VisibleRow<'a>>) {
        if let Some(filter) = &self.filter {
            if !filter(row) {
                return;
            }
        }

        let expanded = self.expanded.contains(&path);
        visible.push(VisibleRow {
            path: path.clone(),
            row,
            expanded,
        });

        if expanded {
            for (index, child) in row.children().iter().enumerate() {
                self.collect_visible(child, path.child(index), visible);
            }
        }
    }
}

impl TreeView for MemoryGrid {
    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn set_expanded(&mut self, path: &RowPath, expanded: bool) {
        let expandable = path
            .resolve(&self.rows)
            .is_some_and(|row| row.is_expandable());
        if !expandable {
            return;
        }

        if expanded {
            self.expanded.insert(path.clone());
        } else {
            self.expanded.remove(path);
        }
    }
}

impl Grid for MemoryGrid {
    fn set_filter(&mut self, predicate: RowPredicate) {
        self.filter = Some(predicate);
    }

    fn clear_filter(&mut self) {
        self.filter = None;
    }

    fn set_data(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.expanded.clear();
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}
