use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Role chosen during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "profile_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Citizen,
    Contractor,
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Citizen => write!(f, "citizen"),
            ProfileRole::Contractor => write!(f, "contractor"),
        }
    }
}

/// Database model for profile; `id` is the authenticated principal
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub role: ProfileRole,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub profession: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for onboarding a new profile
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: String,
    pub display_name: String,
    pub role: ProfileRole,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub profession: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub profession: Option<String>,
}

/// Where a resolved profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Session,
    Store,
}

/// A value tagged with the source that supplied it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ProfileSource,
}
