use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::models::{
    CreateProfile, Profile, ProfileRole, ProfileSource, Resolved, UpdateProfile,
};
use crate::features::profiles::services::ProfileCache;

/// Service for profile onboarding and lookups
pub struct ProfileService {
    pool: PgPool,
    cache: Arc<ProfileCache>,
}

impl ProfileService {
    pub fn new(pool: PgPool, cache: Arc<ProfileCache>) -> Self {
        Self { pool, cache }
    }

    /// Create the caller's profile; a principal can onboard once
    pub async fn create(&self, data: &CreateProfile) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, display_name, role, age, gender, profession)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, display_name, role, age, gender, profession, created_at, updated_at
            "#,
        )
        .bind(&data.id)
        .bind(&data.display_name)
        .bind(data.role)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.profession)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create profile: {:?}", e);
            AppError::FetchFailed(e)
        })?
        .ok_or_else(|| AppError::Conflict("Profile already exists".to_string()))?;

        tracing::info!("Created {} profile: {}", profile.role, profile.id);

        self.cache.put(profile.clone()).await;
        Ok(profile)
    }

    /// Load a profile from the store
    pub async fn find(&self, id: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, display_name, role, age, gender, profession, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Resolve the caller's profile from the session cache, then the store
    pub async fn resolve(&self, user: &AuthenticatedUser) -> Result<Resolved<Profile>> {
        let principal = user.profile_id();

        if let Some(profile) = self.cache.get(principal).await {
            return Ok(Resolved {
                value: profile,
                source: ProfileSource::Session,
            });
        }

        match self.find(principal).await? {
            Some(profile) => {
                self.cache.put(profile.clone()).await;
                Ok(Resolved {
                    value: profile,
                    source: ProfileSource::Store,
                })
            }
            None => Err(AppError::ProfileMissing(principal.to_string())),
        }
    }

    /// Resolve a profile by id, which must be the caller's own
    pub async fn get_owned(&self, user: &AuthenticatedUser, id: &str) -> Result<Resolved<Profile>> {
        user.ensure_owns(id)?;
        self.resolve(user).await
    }

    /// Update the caller's profile in place and refresh the cache
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        data: &UpdateProfile,
    ) -> Result<Profile> {
        user.ensure_owns(id)?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                profession = COALESCE($5, profession),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, display_name, role, age, gender, profession, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&data.display_name)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.profession)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update profile: {:?}", e);
            AppError::FetchFailed(e)
        })?
        .ok_or_else(|| AppError::ProfileMissing(id.to_string()))?;

        tracing::info!("Updated profile: {}", profile.id);

        self.cache.put(profile.clone()).await;
        Ok(profile)
    }

    /// Forget the caller's cached profile
    pub async fn sign_out(&self, user: &AuthenticatedUser) -> bool {
        let cleared = self.cache.invalidate(user.profile_id()).await;
        tracing::info!("Signed out {} (cache cleared: {})", user.sub, cleared);
        cleared
    }

    /// Resolve the caller's profile and require `role`
    pub async fn require_role(&self, user: &AuthenticatedUser, role: ProfileRole) -> Result<Profile> {
        let profile = self.resolve(user).await?.value;
        if profile.role != role {
            return Err(AppError::Forbidden(format!(
                "This action requires a {} profile",
                role
            )));
        }
        Ok(profile)
    }
}
