use super::*;

#[test]
fn test_add_value_creates_group_with_title() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");

    let group = set.get("name").unwrap();
    assert_eq!(group.field(), "name");
    assert_eq!(group.title(), "Name");
    assert_eq!(group.values(), ["bob"]);
}

#[test]
fn test_add_value_keeps_first_title() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("name", "alice", "Other title");

    let group = set.get("name").unwrap();
    assert_eq!(group.title(), "Name");
    assert_eq!(group.values(), ["bob", "alice"]);
}

#[test]
fn test_add_value_duplicate_is_noop() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("name", "bob", "Name");
    assert_eq!(set.get("name").unwrap().values(), ["bob"]);
}

#[test]
fn test_add_value_is_case_sensitive_for_storage() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("name", "Bob", "Name");
    assert_eq!(set.get("name").unwrap().values(), ["bob", "Bob"]);
}

#[test]
fn test_remove_last_value_deletes_group() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.remove_value("name", "bob");
    assert!(set.is_empty());
    assert!(set.get("name").is_none());
}

#[test]
fn test_remove_value_keeps_other_values() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("name", "alice", "Name");
    set.remove_value("name", "bob");
    assert_eq!(set.get("name").unwrap().values(), ["alice"]);
}

#[test]
fn test_remove_value_missing_field_is_noop() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.remove_value("city", "bob");
    set.remove_value("name", "carol");
    assert_eq!(set.len(), 1);
}

#[test]
fn test_groups_iterate_in_creation_order() {
    let mut set = FilterSet::new();
    set.add_value("zeta", "1", "Z");
    set.add_value("alpha", "2", "A");
    set.add_value("mid", "3", "M");
    set.remove_value("alpha", "2");
    set.add_value("alpha", "4", "A");

    let fields: Vec<&str> = set.groups().map(|g| g.field()).collect();
    assert_eq!(fields, vec!["zeta", "mid", "alpha"]);
}

#[test]
fn test_distinct_values_across_groups() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("city", "paris", "City");
    set.add_value("city", "bob", "City");

    assert_eq!(set.distinct_values(), vec!["bob", "paris"]);
}

#[test]
fn test_to_wire_serializes_field_and_values() {
    let mut set = FilterSet::new();
    set.add_value("name", "bob", "Name");
    set.add_value("name", "alice", "Name");

    let json = serde_json::to_string(&set.to_wire()).unwrap();
    assert_eq!(json, r#"[{"field":"name","values":["bob","alice"]}]"#);
}

#[test]
fn test_plain_syntax_never_parses_operators() {
    let expr = QuerySyntax::Plain.parse("> 10");
    assert_eq!(expr.operator(), Operator::Like);
    assert_eq!(expr.operand(), "> 10");
}

#[test]
fn test_operator_syntax_parses_operators() {
    let expr = QuerySyntax::Operators.parse("> 10");
    assert_eq!(expr.operator(), Operator::GreaterThan);
    assert_eq!(expr.operand(), "10");
}
