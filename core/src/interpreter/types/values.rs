//! Runtime value types
//!
//! Containers are reference-counted so that several stack slots can alias the
//! same node. Cloning a `Value` shares containers; `deep_copy` isolates them.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::rc::Rc;

pub type Members = IndexMap<String, Value>;
pub type Elements = Vec<Value>;

/// Shared, mutable object node (insertion ordered)
pub type ObjectRef = Rc<RefCell<Members>>;

/// Shared, mutable array node
pub type ArrayRef = Rc<RefCell<Elements>>;

/// Runtime value type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Value {
    pub fn array(elements: Elements) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object(members: Members) -> Self {
        Value::Object(Rc::new(RefCell::new(members)))
    }

    /// Type name as printed by the `type` command
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::Real(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Member count, element count or character count
    ///
    /// Returns `None` for values that have no size (numbers, bools, null).
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Object(members) => Some(members.borrow().len()),
            Value::Array(elements) => Some(elements.borrow().len()),
            Value::String(s) => Some(s.chars().count()),
            Value::Null | Value::Bool(_) | Value::Integer(_) | Value::Real(_) => None,
        }
    }

    /// Recursively copy this value so no container is shared with the source
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Array(elements) => {
                Value::array(elements.borrow().iter().map(Value::deep_copy).collect())
            }
            Value::Object(members) => Value::object(
                members
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    /// True when both values are the same container node
    pub fn same_node(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/* ===================== serde_json Conversion ===================== */

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::from(*i),
            Value::Real(f) => JsonValue::from(*f),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(elements) => {
                JsonValue::Array(elements.borrow().iter().map(JsonValue::from).collect())
            }
            Value::Object(members) => JsonValue::Object(
                members
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_of_each_kind() {
        assert_eq!(Value::from("").size(), Some(0));
        assert_eq!(Value::from("héllo").size(), Some(5));
        assert_eq!(Value::from(json!([1, 2, 3])).size(), Some(3));
        assert_eq!(Value::from(json!({"a": 1, "b": 2})).size(), Some(2));
        assert_eq!(Value::Bool(true).size(), None);
        assert_eq!(Value::Null.size(), None);
        assert_eq!(Value::Real(1.5).size(), None);
    }

    #[test]
    fn test_clone_aliases_but_deep_copy_does_not() {
        let original = Value::from(json!({"a": [1]}));
        let alias = original.clone();
        let copy = original.deep_copy();

        assert!(alias.same_node(&original));
        assert!(!copy.same_node(&original));
        assert_eq!(copy, original);

        if let Value::Object(members) = &alias {
            members.borrow_mut().insert("b".to_string(), Value::Null);
        }
        assert_eq!(original.size(), Some(2));
        assert_eq!(copy.size(), Some(1));
    }

    #[test]
    fn test_json_conversion_keeps_member_order() {
        let value = Value::from(json!({"z": 1, "a": 2.5, "m": null}));
        let Value::Object(members) = &value else {
            unreachable!("Expected object, got {:?}", value);
        };
        let keys: Vec<String> = members.borrow().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(JsonValue::from(&value), json!({"z": 1, "a": 2.5, "m": null}));
    }

    #[test]
    fn test_large_unsigned_becomes_real() {
        let value = Value::from(json!(u64::MAX));
        assert!(matches!(value, Value::Real(_)));
    }
}
