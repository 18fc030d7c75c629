use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::profiles::models::{
    CreateProfile, Profile, ProfileRole, ProfileSource, Resolved, UpdateProfile,
};
use crate::shared::validation::non_blank;

/// Onboarding questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProfileDto {
    #[validate(
        length(min = 1, max = 100, message = "Display name must be 1-100 characters"),
        regex(
            path = "*crate::shared::validation::DISPLAY_NAME_REGEX",
            message = "Display name may only contain letters, digits, spaces, dots, apostrophes and hyphens"
        )
    )]
    #[schema(example = "Siti Rahma")]
    pub display_name: String,

    pub role: ProfileRole,

    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[validate(length(max = 32, message = "Gender must not exceed 32 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[validate(length(max = 100, message = "Profession must not exceed 100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
}

impl CreateProfileDto {
    pub fn into_create(self, principal: &str) -> CreateProfile {
        CreateProfile {
            id: principal.to_string(),
            display_name: self.display_name.trim().to_string(),
            role: self.role,
            age: self.age,
            gender: non_blank(self.gender),
            profession: non_blank(self.profession),
        }
    }
}

/// Profile update; omitted fields keep their value. Role is fixed at onboarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(
        length(min = 1, max = 100, message = "Display name must be 1-100 characters"),
        regex(
            path = "*crate::shared::validation::DISPLAY_NAME_REGEX",
            message = "Display name may only contain letters, digits, spaces, dots, apostrophes and hyphens"
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[validate(length(max = 32, message = "Gender must not exceed 32 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[validate(length(max = 100, message = "Profession must not exceed 100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
}

impl From<UpdateProfileDto> for UpdateProfile {
    fn from(dto: UpdateProfileDto) -> Self {
        Self {
            display_name: non_blank(dto.display_name),
            age: dto.age,
            gender: non_blank(dto.gender),
            profession: non_blank(dto.profession),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: String,
    pub display_name: String,
    pub role: ProfileRole,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub profession: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponseDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            role: p.role,
            age: p.age,
            gender: p.gender,
            profession: p.profession,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Profile tagged with the source that supplied it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedProfileDto {
    pub profile: ProfileResponseDto,
    pub source: ProfileSource,
}

impl From<Resolved<Profile>> for ResolvedProfileDto {
    fn from(resolved: Resolved<Profile>) -> Self {
        Self {
            profile: resolved.value.into(),
            source: resolved.source,
        }
    }
}
