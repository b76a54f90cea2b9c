//! Partitioning a sequence by a projected key.

use super::equality::structural_eq;
use crate::types::{GroupEntry, Value};

/// Group `values` by `key_selector`.
///
/// Groups appear in first-occurrence order of their key; within a group, items keep their
/// original relative order. Keys are matched with [`structural_eq`], so any value can be a key.
pub fn group_by<F, K>(values: &[Value], mut key_selector: F) -> Vec<GroupEntry>
where
    F: FnMut(&Value) -> K,
    K: Into<Value>,
{
    let mut groups: Vec<GroupEntry> = Vec::new();
    for v in values {
        let key = key_selector(v).into();
        match groups.iter_mut().find(|g| structural_eq(&g.key, &key)) {
            Some(group) => group.items.push(v.clone()),
            None => groups.push(GroupEntry::new(key, vec![v.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::group_by;
    use crate::types::{GroupEntry, Value};

    #[test]
    fn groups_follow_first_seen_key_order() {
        let values: Vec<Value> = ["b1", "a1", "b2", "c1", "a2"]
            .into_iter()
            .map(Value::from)
            .collect();
        let groups = group_by(&values, |v| v.as_str().map(|s| s[..1].to_string()));
        assert_eq!(
            groups,
            vec![
                GroupEntry::new("b", vec![Value::from("b1"), Value::from("b2")]),
                GroupEntry::new("a", vec![Value::from("a1"), Value::from("a2")]),
                GroupEntry::new("c", vec![Value::from("c1")]),
            ]
        );
    }

    #[test]
    fn composite_keys_group_structurally() {
        let values = vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)];
        let groups = group_by(&values, |v| {
            let odd = v.as_i64().unwrap_or(0) % 2 != 0;
            Value::record([("odd", odd)])
        });
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].items, vec![Value::Int64(1), Value::Int64(3)]);
        assert_eq!(groups[1].key, Value::record([("odd", false)]));
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by(&[], |v| v.clone()).is_empty());
    }
}
