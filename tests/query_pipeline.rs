use std::sync::Arc;

use rust_array_query::execution::{QueryMetrics, QueryOptions};
use rust_array_query::processing::{create_query, create_query_with, Query};
use rust_array_query::registry::{lookup, register_default, register_if_absent, DEFAULT_NAME};
use rust_array_query::types::{GroupEntry, Value};
use rust_array_query::QueryError;

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().copied().map(Value::Int64).collect()
}

fn kv(k: i64, v: &str) -> Value {
    Value::record([("k", Value::from(k)), ("v", Value::from(v))])
}

fn field(name: &'static str) -> impl FnMut(&Value) -> Value {
    move |v: &Value| v.get(name).cloned().unwrap_or_default()
}

#[test]
fn distinct_then_order_by() {
    let mut q = create_query(vec![5, 3, 3, 1]).unwrap();
    q.distinct().order_by();
    assert_eq!(q.as_slice(), ints(&[1, 3, 5]).as_slice());
}

#[test]
fn where_then_select() {
    let mut q = create_query(vec![1, 2, 3, 4]).unwrap();
    q.filter(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0))
        .select(|v, _| v.as_i64().unwrap_or(0) * 10);
    assert_eq!(q.into_sequence(), ints(&[20, 40]));
}

#[test]
fn all_on_empty_is_false() {
    let q = create_query(Vec::<Value>::new()).unwrap();
    assert!(!q.all(|_| true));
}

#[test]
fn min_is_seeded_at_zero() {
    let q = create_query(vec![-5, -2, -9]).unwrap();
    assert_eq!(q.min(), 0);
}

#[test]
fn group_by_keeps_first_occurrence_key_order() {
    let mut q = create_query(vec![kv(1, "a"), kv(1, "b"), kv(2, "c")]).unwrap();
    q.group_by(field("k"));
    assert_eq!(
        q.groups(),
        vec![
            GroupEntry::new(1, vec![kv(1, "a"), kv(1, "b")]),
            GroupEntry::new(2, vec![kv(2, "c")]),
        ]
    );
    assert_eq!(q.len(), 2);
}

#[test]
fn zip_drops_unpaired_buffer_elements() {
    let mut q = create_query(vec![1, 2]).unwrap();
    q.zip(vec![10, 20, 30], |a, b| {
        a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0)
    })
    .unwrap();
    assert_eq!(q.as_slice(), ints(&[11, 22]).as_slice());
}

#[test]
fn construction_failures_are_invalid_input() {
    assert!(matches!(
        create_query(Value::Null),
        Err(QueryError::InvalidInput { .. })
    ));
    assert!(matches!(
        create_query("not a list"),
        Err(QueryError::InvalidInput { .. })
    ));
}

#[test]
fn rejected_operand_leaves_buffer_untouched() {
    let mut q = create_query(vec![1, 2, 3]).unwrap();
    let err = q.intersect(Value::record([("a", 1)])).unwrap_err();
    assert!(err.to_string().contains("intersect"));
    assert_eq!(q.as_slice(), ints(&[1, 2, 3]).as_slice());
}

#[test]
fn grouped_records_aggregate_per_group() {
    let rows = vec![
        Value::record([("team", Value::from("core")), ("hours", Value::from(5))]),
        Value::record([("team", Value::from("web")), ("hours", Value::from(3))]),
        Value::record([("team", Value::from("core")), ("hours", Value::from(2))]),
    ];

    let mut q = create_query(rows).unwrap();
    q.group_by(field("team"));

    let totals: Vec<(Value, Value)> = q
        .groups()
        .into_iter()
        .map(|g| {
            let mut members = Query::from_vec(g.items);
            members.select(|row, _| row.get("hours").cloned().unwrap_or_default());
            (g.key, members.sum(true))
        })
        .collect();

    assert_eq!(
        totals,
        vec![
            (Value::from("core"), Value::Int64(7)),
            (Value::from("web"), Value::Int64(3)),
        ]
    );
}

#[test]
fn text_buffers_sort_lexically() {
    let mut q = create_query(vec!["pear", "Apple", "fig"]).unwrap();
    q.order_by();
    assert_eq!(
        q.as_slice(),
        &[Value::from("Apple"), Value::from("fig"), Value::from("pear")]
    );
}

#[test]
fn paging_through_a_range() {
    let mut q = Query::default();
    q.range(1, 25).page(3);
    assert_eq!(q.into_sequence(), ints(&[21, 22, 23, 24, 25]));
}

#[test]
fn extracted_buffer_stays_live() {
    let mut q = create_query(vec![3, 1, 2]).unwrap();
    q.to_sequence().push(Value::Int64(0));
    q.order_by();
    assert_eq!(q.as_slice(), ints(&[0, 1, 2, 3]).as_slice());
}

#[test]
fn metrics_observer_counts_a_pipeline() {
    let metrics = Arc::new(QueryMetrics::new());
    let options = QueryOptions::default().with_observer(metrics.clone());

    let mut q = create_query_with(vec![1, 2, 3, 4, 5], options).unwrap();
    q.filter(|v, _| v.as_i64().is_some_and(|n| n > 2)).take(2);
    let _ = q.union(7);

    let snap = metrics.snapshot();
    assert_eq!(snap.pipelines_created, 1);
    assert_eq!(snap.operators_applied, 2);
    assert_eq!(snap.elements_in, 5 + 3);
    assert_eq!(snap.elements_out, 3 + 2);
    assert_eq!(snap.operands_rejected, 1);
}

#[test]
fn default_registration_is_idempotent() {
    register_default();
    assert!(!register_default());

    let factory = lookup(DEFAULT_NAME).unwrap();
    let mut q = factory(Value::list([2, 1])).unwrap();
    q.order_by();
    assert_eq!(q.as_slice(), ints(&[1, 2]).as_slice());

    fn replacement(_: Value) -> Result<Query, QueryError> {
        Ok(Query::default())
    }
    assert!(!register_if_absent(DEFAULT_NAME, replacement));
    assert_eq!(lookup(DEFAULT_NAME).unwrap()(Value::list([1])).unwrap().len(), 1);
}

#[test]
fn json_document_feeds_a_pipeline() {
    let source: Value = serde_json::from_str(
        r#"[
            {"name": "Ada", "active": true, "score": 98.5},
            {"name": "Bob", "active": false, "score": 71},
            {"name": "Cy", "active": true, "score": "84.25"}
        ]"#,
    )
    .unwrap();

    let mut q = create_query(source).unwrap();
    q.filter(|p, _| p.get("active").and_then(Value::as_bool) == Some(true))
        .select(|p, _| p.get("score").cloned().unwrap_or_default());

    assert_eq!(q.count(), 2);
    assert_eq!(q.sum(false), Value::Float64(182.75));
}

#[test]
fn mixed_sign_min_after_positive_seed() {
    let q = create_query(vec![3, -1, 2]).unwrap();
    assert_eq!(q.min(), -1);
}
