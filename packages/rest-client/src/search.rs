//! Search constraints and their query-string encoding
//!
//! A constraint is an `(attribute, operation, value)` triple. The API
//! receives them joined by `,` in the `q` query parameter:
//!
//! | operation        | wire form     |
//! |------------------|---------------|
//! | `Eq`             | `name:x`      |
//! | `NegEq`          | `~name:x`     |
//! | `Contains`       | `name:*x*`    |
//! | `StartsWith`     | `name:x*`     |
//! | `EndsWith`       | `name:*x`     |
//!
//! Each non-`Eq` variant has a negated twin prefixed with `~`.
//!
//! Whitespace in values is sent as is. A `\`, `*` or `,` inside a value
//! is preceded by `\` so the server reads it literally.

use crate::error::{ClientError, ClientResult};

/// Separator between constraints in the `q` parameter
pub const CONSTRAINT_SEPARATOR: char = ',';

const WILDCARD: char = '*';
const ESCAPE: char = '\\';

/// Escape the characters the server would otherwise interpret
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ESCAPE | WILDCARD | CONSTRAINT_SEPARATOR) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Comparison applied by a search constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOperation {
    Eq,
    NegEq,
    Contains,
    NegContains,
    StartsWith,
    NegStartsWith,
    EndsWith,
    NegEndsWith,
}

impl ClientOperation {
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Self::NegEq | Self::NegContains | Self::NegStartsWith | Self::NegEndsWith
        )
    }
}

/// Attributes the API accepts in search constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Name,
    Description,
}

impl AsRef<str> for SearchField {
    fn as_ref(&self) -> &str {
        match self {
            SearchField::Id => "id",
            SearchField::Name => "name",
            SearchField::Description => "description",
        }
    }
}

/// One `(attribute, operation, value)` search triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub op: ClientOperation,
    pub value: String,
}

impl Constraint {
    pub fn new(field: impl AsRef<str>, op: ClientOperation, value: impl Into<String>) -> Self {
        Self {
            field: field.as_ref().to_string(),
            op,
            value: value.into(),
        }
    }

    /// Wire form of this constraint
    pub fn encode(&self) -> ClientResult<String> {
        let bad_char = |c: char| {
            matches!(c, ':' | '~' | ESCAPE | CONSTRAINT_SEPARATOR) || c.is_whitespace()
        };
        if self.field.is_empty() || self.field.chars().any(bad_char) {
            return Err(ClientError::InvalidConstraint(format!(
                "bad attribute name '{}'",
                self.field
            )));
        }

        let negation = if self.op.is_negated() { "~" } else { "" };
        let escaped = escape_value(&self.value);
        let value = match self.op {
            ClientOperation::Eq | ClientOperation::NegEq => escaped,
            ClientOperation::Contains | ClientOperation::NegContains => {
                format!("*{}*", escaped)
            }
            ClientOperation::StartsWith | ClientOperation::NegStartsWith => {
                format!("{}*", escaped)
            }
            ClientOperation::EndsWith | ClientOperation::NegEndsWith => {
                format!("*{}", escaped)
            }
        };

        Ok(format!("{}{}:{}", negation, self.field, value))
    }
}

/// Join constraints into the value of the `q` parameter
pub fn encode_query(constraints: &[Constraint]) -> ClientResult<String> {
    if constraints.is_empty() {
        return Err(ClientError::InvalidConstraint(
            "at least one constraint is required".to_string(),
        ));
    }

    let encoded = constraints
        .iter()
        .map(Constraint::encode)
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(encoded.join(&CONSTRAINT_SEPARATOR.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_encode_eq() {
        let c = Constraint::new(SearchField::Name, ClientOperation::Eq, "admin");
        assert_eq!(c.encode().unwrap(), "name:admin");
    }

    #[test]
    fn test_encode_negated_eq() {
        let c = Constraint::new(SearchField::Name, ClientOperation::NegEq, "admin");
        assert_eq!(c.encode().unwrap(), "~name:admin");
    }

    #[test]
    fn test_encode_wildcards() {
        let contains = Constraint::new("name", ClientOperation::Contains, "dm");
        let starts = Constraint::new("name", ClientOperation::StartsWith, "ad");
        let ends = Constraint::new("name", ClientOperation::NegEndsWith, "in");
        assert_eq!(contains.encode().unwrap(), "name:*dm*");
        assert_eq!(starts.encode().unwrap(), "name:ad*");
        assert_eq!(ends.encode().unwrap(), "~name:*in");
    }

    #[test]
    fn test_encode_query_joins_constraints() {
        let q = encode_query(&[
            Constraint::new(SearchField::Name, ClientOperation::Eq, "a"),
            Constraint::new(SearchField::Id, ClientOperation::NegEq, "4"),
        ])
        .unwrap();
        assert_eq!(q, "name:a,~id:4");
    }

    #[test]
    fn test_special_characters_in_value_escaped() {
        let eq = |value: &str| Constraint::new(SearchField::Name, ClientOperation::Eq, value);
        assert_eq!(eq("AB*").encode().unwrap(), r"name:AB\*");
        assert_eq!(eq("*AB").encode().unwrap(), r"name:\*AB");
        assert_eq!(eq("a,b").encode().unwrap(), r"name:a\,b");
        assert_eq!(eq(r"a\b").encode().unwrap(), r"name:a\\b");

        let contains = Constraint::new(SearchField::Name, ClientOperation::Contains, "*");
        assert_eq!(contains.encode().unwrap(), r"name:*\**");
    }

    #[test]
    fn test_value_whitespace_kept() {
        let c = Constraint::new(SearchField::Name, ClientOperation::Eq, " READ ");
        assert_eq!(c.encode().unwrap(), "name: READ ");
    }

    #[test]
    fn test_bad_attribute_rejected() {
        for field in ["", "na:me", "~name", "a,b", "na me"] {
            let c = Constraint::new(field, ClientOperation::Eq, "x");
            assert_matches!(c.encode(), Err(ClientError::InvalidConstraint(_)));
        }
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_matches!(encode_query(&[]), Err(ClientError::InvalidConstraint(_)));
    }
}
