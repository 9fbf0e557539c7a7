// src/types/flag.rs
//! Tri-state normalization of loosely typed upstream booleans.
//!
//! The search API encodes yes/no attributes as JSON booleans, numbers or
//! strings depending on the field and tenant. This conversion is applied once,
//! at the persistence boundary:
//!
//! | input                                                        | outcome          |
//! |--------------------------------------------------------------|------------------|
//! | `true`, `1`, `"1"`, `"true"`, `"yes"`                        | [`Flag::True`]    |
//! | `false`, `0`, `"0"`, `"false"`, `"no"`                       | [`Flag::False`]   |
//! | anything else, including `null`, other numbers and strings   | [`Flag::Unknown`] |
//!
//! String matching ignores surrounding whitespace and ASCII case.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    True,
    False,
    Unknown,
}

impl Flag {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Flag::True,
            Value::Bool(false) => Flag::False,
            Value::Number(n) => match n.as_i64() {
                Some(1) => Flag::True,
                Some(0) => Flag::False,
                _ => Flag::Unknown,
            },
            Value::String(s) => Self::from_text(s),
            _ => Flag::Unknown,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if ["1", "true", "yes"]
            .iter()
            .any(|t| text.eq_ignore_ascii_case(t))
        {
            Flag::True
        } else if ["0", "false", "no"]
            .iter()
            .any(|t| text.eq_ignore_ascii_case(t))
        {
            Flag::False
        } else {
            Flag::Unknown
        }
    }

    /// Column value for a nullable SQLite integer.
    pub fn as_sql(self) -> Option<i64> {
        match self {
            Flag::True => Some(1),
            Flag::False => Some(0),
            Flag::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversion_table() {
        let cases = [
            (json!(true), Flag::True),
            (json!(1), Flag::True),
            (json!("1"), Flag::True),
            (json!(" TRUE "), Flag::True),
            (json!("yes"), Flag::True),
            (json!(false), Flag::False),
            (json!(0), Flag::False),
            (json!("0"), Flag::False),
            (json!("False"), Flag::False),
            (json!("no"), Flag::False),
            (json!(null), Flag::Unknown),
            (json!(2), Flag::Unknown),
            (json!(1.5), Flag::Unknown),
            (json!(""), Flag::Unknown),
            (json!("paid"), Flag::Unknown),
            (json!([1]), Flag::Unknown),
            (json!({"value": true}), Flag::Unknown),
        ];
        for (input, expected) in cases {
            assert_eq!(Flag::from_value(&input), expected, "input: {}", input);
        }
    }

    #[test]
    fn sql_mapping() {
        assert_eq!(Flag::True.as_sql(), Some(1));
        assert_eq!(Flag::False.as_sql(), Some(0));
        assert_eq!(Flag::Unknown.as_sql(), None);
    }
}
