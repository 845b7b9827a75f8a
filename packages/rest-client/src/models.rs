//! Resource models understood by the client template

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A persisted resource with a numeric id and a name
///
/// `id` is `None` until the server has created the resource.
pub trait NameableEntity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    fn name(&self) -> &str;
}

/// A security privilege
///
/// Equality ignores `id`, so a locally built privilege equals the copy
/// the server persisted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Privilege {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Privilege {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for Privilege {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.description == other.description
    }
}

impl NameableEntity for Privilege {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sort direction for listing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
