//! People named in a manifest (`author`, `maintainers`, `contributors`).
//!
//! A person is written either as text, `Name <email> (url)`, or as an object
//! `{ "name", "email", "url" }`. It always serializes back to the text form.

use regex_lite::Regex;
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Structured person identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// `Name <email> (url)`, each part optional. A missing `>` still ends the
/// email at the url, and the url runs to the last `)` so it may hold parens.
const PERSON_PATTERN: &str = r"^([^<(]*)(?:<([^>(]*)>?)?\s*(?:\((.*)\))?";

fn person_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(PERSON_PATTERN).ok()).as_ref()
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

impl Person {
    #[must_use]
    pub fn new(
        name: Option<impl Into<String>>,
        email: Option<impl Into<String>>,
        url: Option<impl Into<String>>,
    ) -> Self {
        Self {
            name: name.map(Into::into),
            email: email.map(Into::into),
            url: url.map(Into::into),
        }
    }

    /// Parse `Name <email> (url)` text. Text with no recognizable part
    /// yields a person with no fields set.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let Some(caps) = person_pattern().and_then(|re| re.captures(text.trim())) else {
            return Self::default();
        };

        Self {
            name: non_empty(caps.get(1).map(|m| m.as_str())),
            email: non_empty(caps.get(2).map(|m| m.as_str())),
            url: non_empty(caps.get(3).map(|m| m.as_str())),
        }
    }

    /// Read a person from its manifest value.
    ///
    /// Returns `None` for values that are neither text nor an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::parse(text)),
            Value::Object(obj) => Some(Self {
                name: non_empty(obj.get("name").and_then(Value::as_str)),
                email: non_empty(obj.get("email").and_then(Value::as_str)),
                url: non_empty(obj.get("url").and_then(Value::as_str)),
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_text().is_none()
    }

    /// Format as `Name <email> (url)`, or `None` when no component is set.
    /// Components are trimmed; whitespace-only components count as unset.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(3);
        if let Some(name) = non_empty(self.name.as_deref()) {
            parts.push(name);
        }
        if let Some(email) = non_empty(self.email.as_deref()) {
            parts.push(format!("<{email}>"));
        }
        if let Some(url) = non_empty(self.url.as_deref()) {
            parts.push(format!("({url})"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Manifest value: the text form, or `null` for an empty person.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.to_text().map_or(Value::Null, Value::String)
    }
}

impl FromStr for Person {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full() {
        let p = Person::parse("Barney Rubble <b@rubble.com> (http://barnyrubble.tumblr.com/)");
        assert_eq!(p.name.as_deref(), Some("Barney Rubble"));
        assert_eq!(p.email.as_deref(), Some("b@rubble.com"));
        assert_eq!(p.url.as_deref(), Some("http://barnyrubble.tumblr.com/"));
    }

    #[test]
    fn test_parse_partial() {
        assert_eq!(
            Person::parse("Jane"),
            Person::new(Some("Jane"), None::<String>, None::<String>)
        );
        assert_eq!(
            Person::parse("<jane@example.com>"),
            Person::new(None::<String>, Some("jane@example.com"), None::<String>)
        );
        assert_eq!(
            Person::parse("Jane (https://jane.dev)"),
            Person::new(Some("Jane"), None::<String>, Some("https://jane.dev"))
        );
    }

    #[test]
    fn test_parse_unclosed_email() {
        assert_eq!(
            Person::parse("Jane <jane@example.com"),
            Person::new(Some("Jane"), Some("jane@example.com"), None::<String>)
        );
        assert_eq!(
            Person::parse("Jane <jane@example.com (https://jane.dev)"),
            Person::new(Some("Jane"), Some("jane@example.com"), Some("https://jane.dev"))
        );
    }

    #[test]
    fn test_parse_url_with_parens() {
        let p = Person::parse("Jane (https://en.wikipedia.org/wiki/Rust_(language))");
        assert_eq!(p.name.as_deref(), Some("Jane"));
        assert_eq!(
            p.url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Rust_(language)")
        );
    }

    #[test]
    fn test_parse_without_parts_is_empty() {
        assert!(Person::parse("").is_empty());
        assert!(Person::parse("<>").is_empty());
        assert!(Person::parse("   ").is_empty());
    }

    #[test]
    fn test_whitespace_fields_count_as_unset() {
        let blank = Person::new(Some("  "), None::<String>, None::<String>);
        assert!(blank.is_empty());
        assert_eq!(blank.to_value(), Value::Null);

        let padded = Person::new(Some(" Jane "), Some(" "), Some("https://jane.dev"));
        assert_eq!(padded.to_text().as_deref(), Some("Jane (https://jane.dev)"));
    }

    #[test]
    fn test_empty_person_serializes_to_null() {
        assert_eq!(Person::default().to_text(), None);
        assert_eq!(Person::default().to_value(), Value::Null);
    }

    #[test]
    fn test_text_round_trip() {
        let people = [
            Person::new(Some("A B"), Some("a@b.c"), Some("https://a.b")),
            Person::new(Some("A B"), None::<String>, None::<String>),
            Person::new(None::<String>, Some("a@b.c"), None::<String>),
            Person::new(None::<String>, None::<String>, Some("https://a.b")),
            Person::new(None::<String>, Some("a@b.c"), Some("https://a.b")),
            Person::new(Some("X"), None::<String>, Some("https://w.org/Rust_(lang)")),
        ];

        for person in people {
            let text = person.to_text().unwrap();
            assert_eq!(Person::parse(&text), person, "round trip of {text:?}");
        }
    }

    #[test]
    fn test_from_value() {
        let p = Person::from_value(&json!({"name": "Jane", "email": "jane@example.com"})).unwrap();
        assert_eq!(p.to_text().as_deref(), Some("Jane <jane@example.com>"));

        let p = Person::from_value(&json!("Jane <jane@example.com>")).unwrap();
        assert_eq!(p.email.as_deref(), Some("jane@example.com"));

        assert!(Person::from_value(&json!({})).unwrap().is_empty());
        assert!(Person::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_from_str_and_display() {
        let p: Person = "Jane <jane@example.com>".parse().unwrap();
        assert_eq!(p.to_string(), "Jane <jane@example.com>");
    }
}
