use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub type UserId = u64;

/// Online/offline presence flag.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Online,
    Offline,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Online => "online",
            LineStatus::Offline => "offline",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LineStatus::Online => LineStatus::Offline,
            LineStatus::Offline => LineStatus::Online,
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(LineStatus::Online),
            "offline" => Ok(LineStatus::Offline),
            other => Err(ServiceError::validation(format!(
                "lineStatus must be 'online' or 'offline', got '{other}'"
            ))),
        }
    }
}

/// A stored presence record. `id` never changes after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(rename = "lineStatus")]
    pub line_status: LineStatus,
}

/// Request body for create and update, exactly as the client sent it.
///
/// Both fields are optional at the wire level so that a missing field turns
/// into a readable validation message instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "lineStatus")]
    pub line_status: Option<String>,
}

/// Validated fields for a new record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub line_status: LineStatus,
}

/// Validated partial update; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub line_status: Option<LineStatus>,
}

impl UserInput {
    /// Both fields must be present; the name must not be blank.
    pub fn into_new_user(self) -> Result<NewUser, ServiceError> {
        let name = match self.name {
            Some(n) => validate_name(&n)?,
            None => return Err(ServiceError::validation("User name is required")),
        };
        let line_status = match self.line_status {
            Some(s) if !s.trim().is_empty() => s.trim().parse()?,
            _ => return Err(ServiceError::validation("Line Status is required")),
        };
        Ok(NewUser { name, line_status })
    }

    /// Absent fields are left out of the patch; present ones are validated.
    pub fn into_patch(self) -> Result<UserPatch, ServiceError> {
        let name = self.name.as_deref().map(validate_name).transpose()?;
        let line_status = self
            .line_status
            .as_deref()
            .map(|s| s.trim().parse::<LineStatus>())
            .transpose()?;
        Ok(UserPatch { name, line_status })
    }
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(status) = self.line_status {
            user.line_status = status;
        }
    }
}

fn validate_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("User name is required"));
    }
    Ok(name.to_string())
}
