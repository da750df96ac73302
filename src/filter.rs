//! Filter and field-projection helpers
//!
//! Pure functions used by list and read paths: sparse-field stripping of
//! values equal to a documented default, and multi-key equality filtering.
//! Neither touches store internals.

use serde_json::{Map, Value};

/// Return a copy of `record` with every field whose value equals its entry
/// in `defaults` removed. Matches the sparse-JSON convention of the Kong
/// admin API: a `strip_path` of `false` or an unset optional field is simply
/// absent from responses. Stored state is never modified.
pub fn strip_defaults(record: &Value, defaults: &Map<String, Value>) -> Value {
    let Some(obj) = record.as_object() else {
        return record.clone();
    };

    let mut out = obj.clone();
    for (field, default) in defaults {
        if out.get(field) == Some(default) {
            out.remove(field);
        }
    }
    Value::Object(out)
}

/// Keep only the records matching every non-absent constraint. A record
/// passes a constraint when its string value for that field equals the
/// expected value; constraints with `None` place no restriction.
pub fn filter_records(records: &[Value], constraints: &[(&str, Option<&str>)]) -> Vec<Value> {
    records
        .iter()
        .filter(|record| {
            constraints.iter().all(|(field, expected)| match expected {
                Some(expected) => field_matches(record, field, expected),
                None => true,
            })
        })
        .cloned()
        .collect()
}

/// Exact string equality on one field
fn field_matches(record: &Value, field: &str, expected: &str) -> bool {
    record.get(field).and_then(Value::as_str) == Some(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("strip_path".to_string(), json!(false));
        map.insert("path".to_string(), Value::Null);
        map
    }

    #[test]
    fn strips_fields_equal_to_default() {
        let record = json!({"id": "a", "strip_path": false, "path": null, "name": "Mockbin"});
        let projected = strip_defaults(&record, &defaults());
        assert!(projected.get("strip_path").is_none());
        assert!(projected.get("path").is_none());
        assert_eq!(projected["name"], "Mockbin");
    }

    #[test]
    fn keeps_non_default_values() {
        let record = json!({"id": "a", "strip_path": true, "path": "/mock"});
        let projected = strip_defaults(&record, &defaults());
        assert_eq!(projected["strip_path"], true);
        assert_eq!(projected["path"], "/mock");
    }

    #[test]
    fn projection_does_not_mutate_input() {
        let record = json!({"id": "a", "strip_path": false});
        let _ = strip_defaults(&record, &defaults());
        assert_eq!(record["strip_path"], false);
    }

    #[test]
    fn absent_constraints_match_everything() {
        let records = vec![json!({"name": "a"}), json!({"name": "b"})];
        let kept = filter_records(&records, &[("name", None)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn all_constraints_must_match() {
        let records = vec![
            json!({"name": "a", "public_dns": "a.com"}),
            json!({"name": "a", "public_dns": "b.com"}),
        ];
        let kept = filter_records(&records, &[("name", Some("a")), ("public_dns", Some("b.com"))]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["public_dns"], "b.com");
    }

    #[test]
    fn missing_field_never_matches() {
        let records = vec![json!({"name": "a"})];
        let kept = filter_records(&records, &[("custom_id", Some("x"))]);
        assert!(kept.is_empty());
    }
}
