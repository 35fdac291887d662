//! The `bugs` field: where issues are reported.

use serde_json::{Map, Value};

/// Issue tracker url and/or contact email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugInfo {
    pub url: Option<String>,
    pub email: Option<String>,
}

impl BugInfo {
    #[must_use]
    pub fn new(url: Option<impl Into<String>>, email: Option<impl Into<String>>) -> Self {
        Self {
            url: url.map(Into::into),
            email: email.map(Into::into),
        }
    }

    /// Read bug info from a bare url string or a `{url, email}` object.
    ///
    /// Returns `None` for any other value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(url) => Some(Self {
                url: Some(url.clone()),
                email: None,
            }),
            Value::Object(obj) => Some(Self {
                url: obj.get("url").and_then(Value::as_str).map(String::from),
                email: obj.get("email").and_then(Value::as_str).map(String::from),
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.email.is_none()
    }

    /// `null` when empty, the bare url when there is no email, otherwise an
    /// object holding the fields that are set.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match (&self.url, &self.email) {
            (None, None) => Value::Null,
            (Some(url), None) => Value::String(url.clone()),
            (url, Some(email)) => {
                let mut record = Map::new();
                if let Some(url) = url {
                    record.insert("url".to_string(), Value::String(url.clone()));
                }
                record.insert("email".to_string(), Value::String(email.clone()));
                Value::Object(record)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_value_shapes() {
        assert_eq!(BugInfo::default().to_value(), Value::Null);
        assert_eq!(
            BugInfo::new(Some("https://x"), None::<String>).to_value(),
            json!("https://x")
        );
        assert_eq!(
            BugInfo::new(Some("https://x"), Some("a@b.c")).to_value(),
            json!({"url": "https://x", "email": "a@b.c"})
        );
        assert_eq!(
            BugInfo::new(None::<String>, Some("a@b.c")).to_value(),
            json!({"email": "a@b.c"})
        );
    }

    #[test]
    fn test_from_value() {
        assert_eq!(
            BugInfo::from_value(&json!("https://x")),
            Some(BugInfo::new(Some("https://x"), None::<String>))
        );
        assert_eq!(
            BugInfo::from_value(&json!({"email": "a@b.c"})),
            Some(BugInfo::new(None::<String>, Some("a@b.c")))
        );
        assert!(BugInfo::from_value(&json!({})).unwrap().is_empty());
        assert_eq!(BugInfo::from_value(&json!([1])), None);
    }
}
