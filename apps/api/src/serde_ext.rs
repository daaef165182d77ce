//! Lenient request-field deserializers. Form-driven clients send numbers as
//! strings ("150000") and clear optional fields with "".

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Accepts `12`, `12.0`, `"12"`, `""` or `null` for an optional integer field.
pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IntOrString>::deserialize(deserializer)?;
    let value = match raw {
        None => return Ok(None),
        Some(IntOrString::Int(n)) => n,
        Some(IntOrString::Float(f)) if f.fract() == 0.0 => f as i64,
        Some(IntOrString::Float(f)) => {
            return Err(de::Error::custom(format!("expected a whole number, got {f}")))
        }
        Some(IntOrString::Str(s)) if s.trim().is_empty() => return Ok(None),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("expected a whole number, got '{s}'")))?,
    };
    i32::try_from(value)
        .map(Some)
        .map_err(|_| de::Error::custom(format!("number {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "optional_int")]
        salary: Option<i32>,
    }

    fn parse(value: serde_json::Value) -> Result<Option<i32>, serde_json::Error> {
        serde_json::from_value::<Form>(value).map(|f| f.salary)
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(json!({"salary": 150000})).unwrap(), Some(150000));
        assert_eq!(parse(json!({"salary": "150000"})).unwrap(), Some(150000));
        assert_eq!(parse(json!({"salary": 60.0})).unwrap(), Some(60));
    }

    #[test]
    fn test_blank_and_missing_are_none() {
        assert_eq!(parse(json!({"salary": ""})).unwrap(), None);
        assert_eq!(parse(json!({"salary": null})).unwrap(), None);
        assert_eq!(parse(json!({})).unwrap(), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse(json!({"salary": "lots"})).is_err());
        assert!(parse(json!({"salary": 1.5})).is_err());
        assert!(parse(json!({"salary": 9_999_999_999_i64})).is_err());
    }
}
