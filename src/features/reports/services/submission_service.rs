use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::models::ProfileRole;
use crate::features::profiles::ProfileService;
use crate::features::reports::dtos::ReportDraft;
use crate::features::reports::models::Report;
use crate::features::reports::services::{PhotoService, PhotoUpload, ReportService};

/// Citizen report submission: photos first, then the row
pub struct ReportSubmissionService {
    reports: Arc<ReportService>,
    photos: Arc<PhotoService>,
    profiles: Arc<ProfileService>,
}

impl ReportSubmissionService {
    pub fn new(
        reports: Arc<ReportService>,
        photos: Arc<PhotoService>,
        profiles: Arc<ProfileService>,
    ) -> Self {
        Self {
            reports,
            photos,
            profiles,
        }
    }

    /// Store the photos and insert the report.
    ///
    /// Any upload failure aborts the submission before a row exists. If the
    /// insert fails, the photos stored for it are removed again.
    pub async fn submit(
        &self,
        user: &AuthenticatedUser,
        draft: ReportDraft,
        photos: Vec<PhotoUpload>,
    ) -> Result<Report> {
        self.photos.check(&photos)?;

        let profile = self.profiles.require_role(user, ProfileRole::Citizen).await?;

        let stored = self.photos.upload_all(&profile.id, photos).await?;
        let urls = stored.iter().map(|p| p.url.clone()).collect();

        match self.reports.create(&draft.into_create(profile.id, urls)).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.photos.discard(&stored).await;
                Err(e)
            }
        }
    }
}
