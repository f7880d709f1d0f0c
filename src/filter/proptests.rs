use super::*;
use crate::row::Row;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// フィールド名
fn field_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_map(|s| s)
}

/// フィルタ値（英数字と空白）
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,8}".prop_map(|s| s)
}

/// (field, value) の列から FilterSet を組み立てる
fn filter_set_strategy() -> impl Strategy<Value = FilterSet> {
    prop::collection::vec((field_strategy(), value_strategy()), 0..6).prop_map(|entries| {
        let mut set = FilterSet::new();
        for (field, value) in entries {
            set.add_value(&field, &value, &field);
        }
        set
    })
}

/// 深さ2までの行ツリー（値は小文字英字のみ）
fn row_strategy() -> impl Strategy<Value = Row> {
    let leaf = prop::collection::btree_map(field_strategy(), "[a-z]{0,6}", 0..4).prop_map(
        |fields| {
            let map: Map<String, Value> =
                fields.into_iter().map(|(k, v)| (k, json!(v))).collect();
            Row::new(map)
        },
    );
    leaf.prop_recursive(2, 12, 3, |inner| {
        (
            prop::collection::btree_map(field_strategy(), "[a-z]{0,6}", 0..4),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(fields, children)| {
                let map: Map<String, Value> =
                    fields.into_iter().map(|(k, v)| (k, json!(v))).collect();
                Row::new(map).with_children(children)
            })
    })
}

proptest! {
    /// add → remove で元の状態に戻る（空グループが残らない）
    #[test]
    fn prop_add_then_remove_restores_prior_state(
        set in filter_set_strategy(),
        field in field_strategy(),
        value in value_strategy()
    ) {
        prop_assume!(!set.get(&field).is_some_and(|g| g.contains(&value)));

        let mut updated = set.clone();
        updated.add_value(&field, &value, "Title");
        updated.remove_value(&field, &value);

        prop_assert_eq!(updated, set);
    }

    /// remove の2回目は何もしない
    #[test]
    fn prop_remove_is_idempotent(
        set in filter_set_strategy(),
        field in field_strategy(),
        value in value_strategy()
    ) {
        let mut once = set.clone();
        once.remove_value(&field, &value);
        let mut twice = once.clone();
        twice.remove_value(&field, &value);

        prop_assert_eq!(twice, once);
    }

    /// 空グループは存在しない
    #[test]
    fn prop_no_empty_groups(set in filter_set_strategy()) {
        prop_assert!(set.groups().all(|g| !g.values().is_empty()));
    }

    /// 数字を含むフィルタ値は、小文字英字だけの行ツリーに一致しない
    #[test]
    fn prop_unmatchable_filter_never_matches(
        row in row_strategy(),
        field in field_strategy()
    ) {
        let mut set = FilterSet::new();
        set.add_value(&field, "0", "Title");

        prop_assert!(!Matcher::default().matches(&row, &set));
    }

    /// 一致判定は行自身 OR 子のいずれかの一致と等価
    #[test]
    fn prop_matches_is_direct_or_child(
        row in row_strategy(),
        set in filter_set_strategy()
    ) {
        let matcher = Matcher::default();
        let expected = matcher.matches_directly(&row, &set)
            || row.children().iter().any(|c| matcher.matches(c, &set));
        prop_assert_eq!(matcher.matches(&row, &set), expected);
    }
}
