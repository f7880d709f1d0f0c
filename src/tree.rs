//! ツリーの展開状態の再計算
//!
//! - フィルタなし: 展開可能な行をすべて折りたたむ
//! - フィルタあり: いったん全部折りたたみ、直下の子（子孫込み）が一致する行だけ展開し、
//!   その子に対して同じ規則を再帰的に適用する
//!
//! 同じフィルタで何度呼んでも結果は同じ。

use crate::filter::{FilterSet, Matcher};
use crate::row::{Row, RowPath};

/// 展開・折りたたみを受け付けるツリー（グリッド側が実装する）
pub trait TreeView {
    /// ルート行の一覧
    fn rows(&self) -> &[Row];

    /// 行の展開状態を設定する。存在しないパスは無視する
    fn set_expanded(&mut self, path: &RowPath, expanded: bool);
}

/// 展開計画（展開可能な行すべてについての展開/折りたたみ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityPlan {
    entries: Vec<(RowPath, bool)>,
}

impl VisibilityPlan {
    pub fn entries(&self) -> &[(RowPath, bool)] {
        &self.entries
    }

    /// 展開される行のパス
    pub fn expanded(&self) -> impl Iterator<Item = &RowPath> {
        self.entries
            .iter()
            .filter(|(_, expanded)| *expanded)
            .map(|(path, _)| path)
    }

    pub fn is_expanded(&self, path: &RowPath) -> bool {
        self.entries.iter().any(|(p, expanded)| p == path && *expanded)
    }
}

/// 展開計画を作る（副作用なし）
pub fn plan_visibility(rows: &[Row], matcher: &Matcher, filters: &FilterSet) -> VisibilityPlan {
    let mut entries = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        plan_row(row, RowPath::root(index), matcher, filters, true, &mut entries);
    }
    VisibilityPlan { entries }
}

fn plan_row(
    row: &Row,
    path: RowPath,
    matcher: &Matcher,
    filters: &FilterSet,
    reachable: bool,
    entries: &mut Vec<(RowPath, bool)>,
) {
    if !row.is_expandable() {
        return;
    }

    // 親が展開されていない行は判定せず折りたたむ
    let expand = reachable && !filters.is_empty() && matcher.any_child_matches(row, filters);

    for (index, child) in row.children().iter().enumerate() {
        plan_row(child, path.child(index), matcher, filters, expand, entries);
    }
    entries.push((path, expand));
}

/// ツリーの展開状態をフィルタに合わせて再計算する
pub fn recompute_visibility<T: TreeView + ?Sized>(
    view: &mut T,
    matcher: &Matcher,
    filters: &FilterSet,
) -> VisibilityPlan {
    let plan = plan_visibility(view.rows(), matcher, filters);

    // 先にすべて折りたたんでから展開する
    for (path, _) in plan.entries() {
        view.set_expanded(path, false);
    }
    for path in plan.expanded() {
        view.set_expanded(path, true);
    }
    plan
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
