mod photo_service;
mod report_service;
mod submission_service;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportFilter};
use crate::shared::geo::BoundingBox;

pub use photo_service::{PhotoService, PhotoStorage, PhotoUpload};
pub use report_service::ReportService;
pub use submission_service::ReportSubmissionService;

#[cfg(test)]
pub(crate) use photo_service::fakes;

/// Read access used by the proximity search
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Geolocated reports inside `bounds`, newest first
    async fn fetch_in_bounds(&self, bounds: &BoundingBox, filter: &ReportFilter)
        -> Result<Vec<Report>>;
}
