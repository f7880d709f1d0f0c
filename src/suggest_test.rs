use super::*;
use serde_json::json;

fn rows() -> Vec<Row> {
    serde_json::from_value(json!([
        {"name": "Alice", "city": "Bobigny", "qty": 5, "children": [
            {"name": "Bob", "city": "Paris", "qty": 12},
            {"name": "bobcat", "city": "Lyon", "_children": [{"name": "Bob", "qty": 30}]}
        ]},
        {"name": "Carol", "city": "Bordeaux", "qty": "n/a"}
    ]))
    .unwrap()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("city", "City"),
        Column::new("qty", "Quantity"),
    ]
}

fn pairs(found: &[Suggestion]) -> Vec<(&str, &str)> {
    found
        .iter()
        .map(|s| (s.field.as_str(), s.value.as_str()))
        .collect()
}

#[test]
fn test_scan_finds_distinct_values_per_field_recursively() {
    let found = scan_rows(&rows(), "bob", &columns(), QuerySyntax::Plain);
    assert_eq!(
        pairs(&found),
        vec![("name", "Bob"), ("name", "bobcat"), ("city", "Bobigny")]
    );
    assert!(found.iter().all(|s| s.operator == Operator::Like));
}

#[test]
fn test_scan_empty_term_returns_nothing() {
    assert!(scan_rows(&rows(), "", &columns(), QuerySyntax::Plain).is_empty());
}

#[test]
fn test_scan_only_given_columns() {
    let only_city = vec![Column::new("city", "City")];
    let found = scan_rows(&rows(), "bo", &only_city, QuerySyntax::Plain);
    assert_eq!(pairs(&found), vec![("city", "Bobigny"), ("city", "Bordeaux")]);
}

#[test]
fn test_scan_plain_ignores_numbers() {
    let found = scan_rows(&rows(), "12", &columns(), QuerySyntax::Plain);
    assert!(found.is_empty());
}

#[test]
fn test_scan_operator_syntax_ordering_accepts_numbers() {
    let found = scan_rows(&rows(), "> 10", &columns(), QuerySyntax::Operators);
    // qty: 12, 30 は数値比較。"n/a" は文字列比較 "n/a" > "10" で一致
    // name/city も文字列比較で "10" より大きいものが一致する
    let qty: Vec<&str> = found
        .iter()
        .filter(|s| s.field == "qty")
        .map(|s| s.value.as_str())
        .collect();
    assert_eq!(qty, vec!["12", "30", "n/a"]);
    assert!(found.iter().all(|s| s.operator == Operator::GreaterThan));
}

#[test]
fn test_scan_operator_syntax_starts_with() {
    let found = scan_rows(&rows(), "starts with bo", &columns(), QuerySyntax::Operators);
    assert_eq!(
        pairs(&found),
        vec![
            ("name", "Bob"),
            ("name", "bobcat"),
            ("city", "Bobigny"),
            ("city", "Bordeaux")
        ]
    );
    assert_eq!(found[0].filter_value(), "starts with Bob");
}

#[test]
fn test_suggestion_filter_value_like_is_raw() {
    let suggestion = Suggestion {
        field: "name".to_string(),
        title: "Name".to_string(),
        value: "Bob".to_string(),
        operator: Operator::Like,
    };
    assert_eq!(suggestion.filter_value(), "Bob");
}

#[test]
fn test_suggestions_group_by_field_and_dedupe() {
    let make = |field: &str, value: &str| Suggestion {
        field: field.to_string(),
        title: field.to_uppercase(),
        value: value.to_string(),
        operator: Operator::Like,
    };

    let grouped = Suggestions::from_flat(vec![
        make("name", "Bob"),
        make("city", "Bobigny"),
        make("name", "Bob"),
        make("name", "bob"),
        make("city", "Bobigny"),
    ]);

    assert_eq!(grouped.len(), 3);
    let groups = grouped.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].field, "name");
    assert_eq!(groups[0].title, "NAME");
    let values: Vec<&str> = groups[0].entries.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["Bob", "bob"]);
    assert_eq!(groups[1].entries.len(), 1);
}

#[test]
fn test_suggestions_empty() {
    let grouped = Suggestions::from_flat(Vec::new());
    assert!(grouped.is_empty());
    assert_eq!(grouped.len(), 0);
}

#[tokio::test]
async fn test_local_source_find_matches() {
    let source = LocalSource::new(rows(), QuerySyntax::Plain);
    let found = source.find_matches("carol", &columns()).await;
    assert_eq!(pairs(&found), vec![("name", "Carol")]);
    assert_eq!(source.min_term_length(), 0);
}

#[tokio::test]
async fn test_local_source_apply() {
    let source = LocalSource::new(rows(), QuerySyntax::Plain);

    assert!(matches!(source.apply(&FilterSet::new()).await, Applied::Clear));

    let mut filters = FilterSet::new();
    filters.add_value("name", "bob", "Name");
    match source.apply(&filters).await {
        Applied::Filter(applied) => assert_eq!(applied, filters),
        _ => panic!("expected Filter"),
    }
}
