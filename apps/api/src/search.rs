//! Search expressions over privileges
//!
//! Clients send constraints in the `q` query parameter, separated by
//! `,`. Each constraint is `[~]field:value`; a leading `~` negates it and
//! `*` at either end of the value turns an exact match into a
//! starts-with, ends-with or contains match. All constraints must hold.
//!
//! Values are taken verbatim, whitespace included. A `\` makes the
//! next character literal, so `name:AB\*` matches the name `AB*` and
//! `name:a\,b` matches `a,b`.
//!
//! The same [`SearchCriteria`] is evaluated in memory by
//! [`SearchCriteria::matches`] and translated to SQL by
//! [`SearchCriteria::push_where`], so both repositories agree.

use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;

use crate::models::Privilege;
use crate::repositories::utils::escape_like;

const CONSTRAINT_SEPARATOR: char = ',';
const NEGATION_PREFIX: char = '~';
const FIELD_SEPARATOR: char = ':';
const WILDCARD: char = '*';
const ESCAPE: char = '\\';

/// Split on `separator` wherever it is not escaped
fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == separator {
            parts.push(&input[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Errors raised while parsing a search expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("constraint '{0}' is not of the form field:value")]
    Malformed(String),
    #[error("unknown search field '{0}'")]
    UnknownField(String),
    #[error("constraint on '{0}' has an empty value")]
    EmptyValue(String),
    #[error("id value '{0}' is not a number")]
    InvalidId(String),
    #[error("wildcards are not supported on id")]
    WildcardOnId,
}

/// Text attributes that support pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
}

impl TextField {
    fn column(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Description => "description",
        }
    }

    fn value<'a>(&self, privilege: &'a Privilege) -> Option<&'a str> {
        match self {
            TextField::Name => Some(privilege.name.as_str()),
            TextField::Description => privilege.description.as_deref(),
        }
    }
}

/// How a text constraint compares its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Exact(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

impl Pattern {
    fn parse(raw: &str) -> Self {
        // (character, was escaped)
        let mut chars = Vec::with_capacity(raw.len());
        let mut iter = raw.chars();
        while let Some(c) = iter.next() {
            if c == ESCAPE {
                // a trailing escape stands for itself
                chars.push((iter.next().unwrap_or(ESCAPE), true));
            } else {
                chars.push((c, false));
            }
        }

        let is_wildcard = |c: Option<&(char, bool)>| c == Some(&(WILDCARD, false));

        let leading = is_wildcard(chars.first());
        let body = if leading { &chars[1..] } else { &chars[..] };
        let trailing = is_wildcard(body.last());
        let body = if trailing {
            &body[..body.len() - 1]
        } else {
            body
        };
        let inner: String = body.iter().map(|(c, _)| *c).collect();

        match (leading, trailing) {
            (true, true) => Pattern::Contains(inner),
            (true, false) => Pattern::EndsWith(inner),
            (false, true) => Pattern::StartsWith(inner),
            (false, false) => Pattern::Exact(inner),
        }
    }

    fn value(&self) -> &str {
        match self {
            Pattern::Exact(v)
            | Pattern::Contains(v)
            | Pattern::StartsWith(v)
            | Pattern::EndsWith(v) => v,
        }
    }

    fn is_match(&self, candidate: &str) -> bool {
        match self {
            Pattern::Exact(v) => candidate == v,
            Pattern::Contains(v) => candidate.contains(v.as_str()),
            Pattern::StartsWith(v) => candidate.starts_with(v.as_str()),
            Pattern::EndsWith(v) => candidate.ends_with(v.as_str()),
        }
    }

    /// LIKE pattern for the non-exact variants
    fn like(&self) -> Option<String> {
        match self {
            Pattern::Exact(_) => None,
            Pattern::Contains(v) => Some(format!("%{}%", escape_like(v))),
            Pattern::StartsWith(v) => Some(format!("{}%", escape_like(v))),
            Pattern::EndsWith(v) => Some(format!("%{}", escape_like(v))),
        }
    }
}

/// A single parsed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Id {
        negated: bool,
        value: i64,
    },
    Text {
        field: TextField,
        pattern: Pattern,
        negated: bool,
    },
}

impl Constraint {
    /// Parse one constraint; only the part before the value is trimmed
    fn parse(raw: &str) -> Result<Self, SearchError> {
        let raw = raw.trim_start();
        let (negated, body) = match raw.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (field, value) = body
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| SearchError::Malformed(raw.trim_end().to_string()))?;

        match field.trim() {
            "id" => {
                if value.contains(WILDCARD) {
                    return Err(SearchError::WildcardOnId);
                }
                let value = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| SearchError::InvalidId(value.to_string()))?;
                Ok(Constraint::Id { negated, value })
            }
            "name" | "description" => {
                let field = if field.trim() == "name" {
                    TextField::Name
                } else {
                    TextField::Description
                };
                let pattern = Pattern::parse(value);
                if pattern.value().is_empty() {
                    return Err(SearchError::EmptyValue(field.column().to_string()));
                }
                Ok(Constraint::Text {
                    field,
                    pattern,
                    negated,
                })
            }
            other => Err(SearchError::UnknownField(other.to_string())),
        }
    }

    fn matches(&self, privilege: &Privilege) -> bool {
        match self {
            Constraint::Id { negated, value } => (privilege.id == *value) != *negated,
            Constraint::Text {
                field,
                pattern,
                negated,
            } => {
                let hit = field
                    .value(privilege)
                    .map(|candidate| pattern.is_match(candidate))
                    .unwrap_or(false);
                hit != *negated
            }
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Constraint::Id { negated, value } => {
                builder.push(if *negated { "id <> " } else { "id = " });
                builder.push_bind(*value);
            }
            Constraint::Text {
                field,
                pattern,
                negated,
            } => {
                let column = field.column();
                match (pattern.like(), *negated) {
                    (None, false) => {
                        builder.push(format!("{} = ", column));
                        builder.push_bind(pattern.value().to_string());
                    }
                    (None, true) => {
                        builder.push(format!("{} IS DISTINCT FROM ", column));
                        builder.push_bind(pattern.value().to_string());
                    }
                    (Some(like), false) => {
                        builder.push(format!("{} LIKE ", column));
                        builder.push_bind(like);
                        builder.push(" ESCAPE '\\'");
                    }
                    (Some(like), true) => {
                        builder.push(format!("({0} IS NULL OR {0} NOT LIKE ", column));
                        builder.push_bind(like);
                        builder.push(" ESCAPE '\\')");
                    }
                }
            }
        }
    }
}

/// Conjunction of constraints; empty criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    constraints: Vec<Constraint>,
}

impl SearchCriteria {
    /// Parse the value of the `q` query parameter
    pub fn parse(query: &str) -> Result<Self, SearchError> {
        let constraints = split_unescaped(query, CONSTRAINT_SEPARATOR)
            .into_iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(Constraint::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { constraints })
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Evaluate against an in-memory privilege
    pub fn matches(&self, privilege: &Privilege) -> bool {
        self.constraints.iter().all(|c| c.matches(privilege))
    }

    /// Append a `WHERE` clause (if any) to a query under construction
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (index, constraint) in self.constraints.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            constraint.push_sql(builder);
        }
    }
}
