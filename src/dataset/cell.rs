//! Cell helpers for response values
//!
//! Cells are plain `serde_json::Value`s. These helpers define the engine-wide
//! view of a cell:
//! - `null` and empty strings are missing
//! - numbers compare numerically (`5` matches `5.0`)
//! - no coercion between strings and numbers for equality
//! - multi-choice cells are arrays of selected codes

use serde_json::Value;

/// Returns true if the cell carries no answer.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_missing),
        _ => false,
    }
}

/// Numeric view of a cell.
///
/// Numbers map to themselves; strings holding a number are parsed. Used only
/// by numeric semantics (means, ranges, scale codes), never by equality.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Type-aware equality between a cell and a requested value.
///
/// Missing cells never match.
pub fn values_match(cell: &Value, expected: &Value) -> bool {
    if is_missing(cell) {
        return false;
    }
    match (cell, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

/// Option-code identity used by metrics and grouping.
///
/// Like [`values_match`], but a numeric string and a number with the same
/// value denote the same code (`"4"` and `4`).
pub fn same_code(a: &Value, b: &Value) -> bool {
    if values_match(a, b) {
        return true;
    }
    if is_missing(a) || is_missing(b) {
        return false;
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Selected codes of a multi-choice cell.
///
/// Arrays yield their non-missing members; a scalar answer counts as a single
/// selection. Missing cells and empty selections yield `None`.
pub fn selections(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => {
            let picked: Vec<&Value> = items.iter().filter(|v| !is_missing(v)).collect();
            if picked.is_empty() {
                None
            } else {
                Some(picked)
            }
        }
        other if is_missing(other) => None,
        other => Some(vec![other]),
    }
}

/// Stable text label for a cell or code.
///
/// Integral numbers print without a fractional part so that `4` and `4.0`
/// label the same group.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(_) => value.to_string(),
    }
}

/// Group label of an option code or a single answer.
///
/// Anything with a numeric view is labelled by its number, so codes that
/// [`same_code`] considers equal (`"4.0"`, `"4"`, `4`) share one label.
pub fn code_label(value: &Value) -> String {
    match as_number(value) {
        Some(f) => format_number(f),
        None => display_value(value),
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_values() {
        assert!(is_missing(&json!(null)));
        assert!(is_missing(&json!("")));
        assert!(is_missing(&json!("   ")));
        assert!(is_missing(&json!([])));
        assert!(!is_missing(&json!(0)));
        assert!(!is_missing(&json!("A")));
        assert!(!is_missing(&json!(["A"])));
    }

    #[test]
    fn test_numeric_equality_normalized() {
        assert!(values_match(&json!(5), &json!(5.0)));
        assert!(!values_match(&json!(5), &json!(6)));
    }

    #[test]
    fn test_no_string_number_coercion() {
        assert!(!values_match(&json!(5), &json!("5")));
        assert!(!values_match(&json!("5"), &json!(5)));
        assert!(values_match(&json!("NORTH"), &json!("NORTH")));
    }

    #[test]
    fn test_missing_never_matches() {
        assert!(!values_match(&json!(null), &json!(null)));
        assert!(!values_match(&json!(""), &json!("")));
    }

    #[test]
    fn test_same_code_bridges_numeric_strings() {
        assert!(same_code(&json!("4"), &json!(4)));
        assert!(same_code(&json!("A"), &json!("A")));
        assert!(!same_code(&json!("A"), &json!("B")));
        assert!(!same_code(&json!(null), &json!(null)));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(7)), Some(7.0));
        assert_eq!(as_number(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!(true)), None);
    }

    #[test]
    fn test_selections() {
        let cell = json!(["A", null, "C"]);
        let picked = selections(&cell).unwrap();
        assert_eq!(picked, vec![&json!("A"), &json!("C")]);

        assert!(selections(&json!([])).is_none());
        assert!(selections(&json!(null)).is_none());
        assert_eq!(selections(&json!("B")).unwrap(), vec![&json!("B")]);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(4)), "4");
        assert_eq!(display_value(&json!(4.0)), "4");
        assert_eq!(display_value(&json!(4.5)), "4.5");
        assert_eq!(display_value(&json!("EMEA")), "EMEA");
        assert_eq!(display_value(&json!(["A", "B"])), "A;B");
    }

    #[test]
    fn test_code_label_follows_same_code() {
        assert_eq!(code_label(&json!("4.0")), "4");
        assert_eq!(code_label(&json!(4)), "4");
        assert_eq!(code_label(&json!(" 2.50 ")), "2.5");
        assert_eq!(code_label(&json!("EMEA")), "EMEA");
        assert!(same_code(&json!("4.0"), &json!(4)));
    }
}
