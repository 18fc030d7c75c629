use crate::features::reports::models::Report;
use crate::shared::geo::{haversine_km, Coordinates};

/// A report within the search radius and its distance from the center
#[derive(Debug, Clone, PartialEq)]
pub struct RankedReport {
    pub report: Report,
    pub distance_km: f64,
}

/// Keep candidates within `radius_km` of `center`, nearest first.
///
/// Reports without coordinates are skipped. Equal distances keep their
/// input order.
pub fn rank_by_distance(
    center: Coordinates,
    radius_km: f64,
    candidates: Vec<Report>,
) -> Vec<RankedReport> {
    let mut ranked: Vec<RankedReport> = candidates
        .into_iter()
        .filter_map(|report| {
            let distance_km = haversine_km(center, report.coordinates()?);
            (distance_km <= radius_km).then_some(RankedReport {
                report,
                distance_km,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
