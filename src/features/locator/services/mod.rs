mod distance_ranker;
mod location_acquirer;
mod proximity_service;

use std::net::IpAddr;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::locator::models::LocationFailure;
use crate::shared::geo::Coordinates;

pub use distance_ranker::{rank_by_distance, RankedReport};
pub use location_acquirer::{LocationAcquirer, ReportedPosition};
pub use proximity_service::ProximityService;

/// Primary position source for one request
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn locate(&self) -> std::result::Result<Coordinates, LocationFailure>;
}

/// Coarse fallback position from the caller's network address
#[async_trait]
pub trait NetworkLocator: Send + Sync {
    async fn locate(&self, ip: Option<IpAddr>) -> std::result::Result<Coordinates, LocationFailure>;
}

/// Human-readable address for a point; `None` when nothing is known
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: Coordinates) -> Result<Option<String>>;
}
