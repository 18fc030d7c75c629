use std::net::IpAddr;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::locator::models::UserLocation;
use crate::features::locator::services::{
    rank_by_distance, LocationAcquirer, PositionProvider, RankedReport,
};
use crate::features::reports::models::ReportFilter;
use crate::features::reports::services::ReportStore;
use crate::shared::constants::MAX_SEARCH_RADIUS_KM;
use crate::shared::geo::{BoundingBox, Coordinates};

/// Proximity search: acquire a position, fetch bounding-box candidates,
/// keep and rank those inside the radius
pub struct ProximityService {
    store: Arc<dyn ReportStore>,
    acquirer: Arc<LocationAcquirer>,
}

impl ProximityService {
    pub fn new(store: Arc<dyn ReportStore>, acquirer: Arc<LocationAcquirer>) -> Self {
        Self { store, acquirer }
    }

    /// Caller position only
    pub async fn locate(
        &self,
        device: &dyn PositionProvider,
        client_ip: Option<IpAddr>,
        resolve_address: bool,
    ) -> Result<UserLocation> {
        self.acquirer.acquire(device, client_ip, resolve_address).await
    }

    /// Reports within `radius_km` of `center`, nearest first.
    ///
    /// `filter.limit` applies to the ranked result, not to the candidates.
    pub async fn search_near(
        &self,
        center: Coordinates,
        radius_km: f64,
        filter: &ReportFilter,
    ) -> Result<Vec<RankedReport>> {
        check_radius(radius_km)?;

        let bounds = BoundingBox::around(center, radius_km);
        let candidate_filter = ReportFilter {
            limit: None,
            ..filter.clone()
        };
        let candidates = self.store.fetch_in_bounds(&bounds, &candidate_filter).await?;
        let candidate_count = candidates.len();

        let mut ranked = rank_by_distance(center, radius_km, candidates);
        if let Some(limit) = filter.limit {
            ranked.truncate(limit.max(0) as usize);
        }

        tracing::debug!(
            "Proximity search at ({}, {}) r={}km: {} candidates, {} within radius",
            center.latitude,
            center.longitude,
            radius_km,
            candidate_count,
            ranked.len()
        );

        Ok(ranked)
    }

    /// Acquire the caller's position, then search around it
    pub async fn nearby(
        &self,
        device: &dyn PositionProvider,
        client_ip: Option<IpAddr>,
        radius_km: f64,
        filter: &ReportFilter,
        resolve_address: bool,
    ) -> Result<(UserLocation, Vec<RankedReport>)> {
        check_radius(radius_km)?;

        let location = self.locate(device, client_ip, resolve_address).await?;
        let reports = self
            .search_near(location.coordinates, radius_km, filter)
            .await?;

        Ok((location, reports))
    }
}

fn check_radius(radius_km: f64) -> Result<()> {
    if radius_km.is_finite() && radius_km > 0.0 && radius_km <= MAX_SEARCH_RADIUS_KM {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "radius_km must be greater than 0 and at most {}",
            MAX_SEARCH_RADIUS_KM
        )))
    }
}
