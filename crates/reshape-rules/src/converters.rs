//! Built-in converters
//!
//! Each takes `(value, source)` like any other converter. `null` passes through
//! unchanged so a converter chained after a default never has to special-case it.

use serde_json::{Number, Value};

/// Render a scalar as text
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn map_text(value: &Value, op: &str, f: impl Fn(&str) -> String) -> crate::Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        _ => as_text(value)
            .map(|s| Value::String(f(&s)))
            .ok_or_else(|| crate::Error::transform(format!("Cannot {op} non-scalar value"))),
    }
}

/// Convert string to uppercase
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn uppercase(value: &Value, _source: &Value) -> crate::Result<Value> {
    map_text(value, "uppercase", str::to_uppercase)
}

/// Convert string to lowercase
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn lowercase(value: &Value, _source: &Value) -> crate::Result<Value> {
    map_text(value, "lowercase", str::to_lowercase)
}

/// Trim whitespace from string
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn trim(value: &Value, _source: &Value) -> crate::Result<Value> {
    map_text(value, "trim", |s| s.trim().to_string())
}

/// Render a scalar as a string; arrays and objects become compact JSON
///
/// # Errors
///
/// Never fails; the signature matches the other converters.
pub fn to_string(value: &Value, _source: &Value) -> crate::Result<Value> {
    Ok(match value {
        Value::Null => Value::Null,
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        _ => Value::String(as_text(value).unwrap_or_default()),
    })
}

/// Parse numbers out of strings; integers stay integers
///
/// # Errors
///
/// Returns an error if the string is not numeric, the result is not finite,
/// or the value is neither a number nor a string.
pub fn to_number(value: &Value, _source: &Value) -> crate::Result<Value> {
    match value {
        Value::Null | Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(integer) = trimmed.parse::<i64>() {
                return Ok(Value::Number(integer.into()));
            }
            let float = trimmed.parse::<f64>().map_err(|_| {
                crate::Error::transform(format!("Cannot parse '{s}' as number"))
            })?;
            Number::from_f64(float)
                .map(Value::Number)
                .ok_or_else(|| crate::Error::transform(format!("'{s}' is not a finite number")))
        }
        _ => Err(crate::Error::transform("Invalid value type for number conversion")),
    }
}

/// Interpret common truthy and falsy spellings as booleans
///
/// # Errors
///
/// Returns an error for strings that are not a recognized spelling, and for
/// arrays or objects.
pub fn to_boolean(value: &Value, _source: &Value) -> crate::Result<Value> {
    match value {
        Value::Null | Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "n" | "0" | "" => Ok(Value::Bool(false)),
            _ => Err(crate::Error::transform(format!(
                "Cannot interpret '{s}' as boolean"
            ))),
        },
        Value::Array(_) | Value::Object(_) => Err(crate::Error::transform(
            "Invalid value type for boolean conversion",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(
        converter: fn(&Value, &Value) -> crate::Result<Value>,
        value: Value,
    ) -> crate::Result<Value> {
        converter(&value, &json!({}))
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(run(uppercase, json!("abc123")).unwrap(), json!("ABC123"));
        assert_eq!(run(lowercase, json!("HeLLo")).unwrap(), json!("hello"));
        assert_eq!(run(uppercase, json!(12)).unwrap(), json!("12"));
        assert_eq!(run(uppercase, json!(null)).unwrap(), json!(null));
        assert!(run(lowercase, json!(["a"])).is_err());
    }

    #[test]
    fn test_trim() {
        assert_eq!(run(trim, json!("  padded  ")).unwrap(), json!("padded"));
        assert!(run(trim, json!({"a": 1})).is_err());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(run(to_string, json!(42)).unwrap(), json!("42"));
        assert_eq!(run(to_string, json!(true)).unwrap(), json!("true"));
        assert_eq!(run(to_string, json!([1, 2])).unwrap(), json!("[1,2]"));
        assert_eq!(run(to_string, json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(run(to_number, json!("42")).unwrap(), json!(42));
        assert_eq!(run(to_number, json!(" 4.5 ")).unwrap(), json!(4.5));
        assert_eq!(run(to_number, json!(7)).unwrap(), json!(7));
        assert!(run(to_number, json!("forty")).is_err());
        assert!(run(to_number, json!("NaN")).is_err());
        assert!(run(to_number, json!(false)).is_err());
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(run(to_boolean, json!("Yes")).unwrap(), json!(true));
        assert_eq!(run(to_boolean, json!("0")).unwrap(), json!(false));
        assert_eq!(run(to_boolean, json!(3)).unwrap(), json!(true));
        assert_eq!(run(to_boolean, json!(0)).unwrap(), json!(false));
        assert!(run(to_boolean, json!("maybe")).is_err());
    }
}
