//! Privilege model, payload and validation

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{ApiError, ApiResult};

/// Maximum length for a privilege name (matches database constraint)
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length for a privilege description (matches database constraint)
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Persisted privilege record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Privilege {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Validated data for inserting a privilege
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrivilege {
    pub name: String,
    pub description: Option<String>,
}

/// Privilege as submitted by clients on create and update
///
/// Every field is optional at the wire level so that a structurally
/// valid but semantically invalid resource is reported as a state
/// conflict rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivilegePayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PrivilegePayload {
    /// Validate a payload for creation; the server assigns the id
    pub fn into_new(self) -> ApiResult<NewPrivilege> {
        if let Some(id) = self.id {
            return Err(ApiError::InvalidState(format!(
                "id must be null on creation (got {})",
                id
            )));
        }

        let (name, description) = validate_fields(self.name, self.description)?;
        Ok(NewPrivilege { name, description })
    }

    /// Validate a payload for update; the id names the target
    pub fn into_existing(self) -> ApiResult<Privilege> {
        let id = self
            .id
            .ok_or_else(|| ApiError::InvalidState("id is required on update".to_string()))?;

        let (name, description) = validate_fields(self.name, self.description)?;
        Ok(Privilege {
            id,
            name,
            description,
        })
    }
}

fn validate_fields(
    name: Option<String>,
    description: Option<String>,
) -> ApiResult<(String, Option<String>)> {
    let name = name.unwrap_or_default();

    if name.trim().is_empty() {
        return Err(ApiError::InvalidState("name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::InvalidState(format!(
            "name exceeds maximum length of {}",
            MAX_NAME_LEN
        )));
    }
    if let Some(description) = &description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::InvalidState(format!(
                "description exceeds maximum length of {}",
                MAX_DESCRIPTION_LEN
            )));
        }
    }

    Ok((name, description))
}
