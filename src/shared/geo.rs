//! Great-circle helpers shared by report submission and the proximity search.
//!
//! Distances are kilometres on a sphere of radius [`EARTH_RADIUS_KM`];
//! coordinates are WGS84 decimal degrees.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{EARTH_RADIUS_KM, KM_PER_DEGREE};

/// Slack added to box edges so points exactly on the circle survive float rounding
const EDGE_EPSILON_DEG: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Checked constructor; rejects non-finite and out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err("latitude must be between -90 and 90".to_string());
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err("longitude must be between -180 and 180".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Pairs optional columns; a half-present pair is not a position
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Haversine distance between two points, in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards asin against h drifting just above 1.0 for antipodes
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Rectangular pre-filter around a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box covering every point within `radius_km` of `center`.
    ///
    /// Latitude uses the flat 1° ≈ 111 km delta. Longitude is widened to the
    /// circle's true east-west extent at the center latitude, and the box
    /// spans all longitudes once it reaches a pole or crosses the antimeridian.
    pub fn around(center: Coordinates, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE + EDGE_EPSILON_DEG;
        let min_lat = (center.latitude - lat_delta).max(-90.0);
        let max_lat = (center.latitude + lat_delta).min(90.0);

        let angular = radius_km / EARTH_RADIUS_KM;
        let polar_gap = std::f64::consts::FRAC_PI_2 - center.latitude.abs().to_radians();
        let reaches_pole = angular >= polar_gap
            || center.latitude + lat_delta >= 90.0
            || center.latitude - lat_delta <= -90.0;

        let lon_delta = if reaches_pole {
            180.0
        } else {
            let exact = (angular.sin() / center.latitude.to_radians().cos())
                .min(1.0)
                .asin()
                .to_degrees();
            exact.max(lat_delta) + EDGE_EPSILON_DEG
        };

        let (min_lon, max_lon) = {
            let west = center.longitude - lon_delta;
            let east = center.longitude + lon_delta;
            if west < -180.0 || east > 180.0 {
                (-180.0, 180.0)
            } else {
                (west, east)
            }
        };

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }
}

/// Human-readable distance: whole metres under 1 km, otherwise one decimal km
pub fn format_distance(distance_km: f64) -> String {
    let meters = (distance_km * 1000.0).round();
    if meters < 1000.0 {
        format!("{}m", meters.max(0.0) as i64)
    } else {
        format!("{:.1}km", distance_km)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Point reached by travelling `distance_km` from `start` along `bearing_deg`
    pub(crate) fn destination(start: Coordinates, bearing_deg: f64, distance_km: f64) -> Coordinates {
        let d = distance_km / EARTH_RADIUS_KM;
        let theta = bearing_deg.to_radians();
        let lat1 = start.latitude.to_radians();
        let lon1 = start.longitude.to_radians();

        let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

        let longitude = (lon2.to_degrees() + 540.0) % 360.0 - 180.0;
        Coordinates {
            latitude: lat2.to_degrees(),
            longitude,
        }
    }

    fn at(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates {
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_haversine_close_points() {
        let distance = haversine_km(at(37.7749, -122.4194), at(37.7750, -122.4195));
        assert!((distance - 0.0142).abs() < 0.0005, "got {}", distance);
        assert_eq!(format_distance(distance), "14m");
    }

    #[test]
    fn test_haversine_one_degree_on_equator() {
        let distance = haversine_km(at(0.0, 0.0), at(1.0, 0.0));
        assert!((distance - 111.19).abs() < 0.1, "got {}", distance);
    }

    #[test]
    fn test_haversine_same_point_and_symmetry() {
        let jakarta = at(-6.2088, 106.8456);
        let bandung = at(-6.9175, 107.6191);

        assert!(haversine_km(jakarta, jakarta) < 1e-9);
        let there = haversine_km(jakarta, bandung);
        let back = haversine_km(bandung, jakarta);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 110.0 && there < 125.0);
    }

    #[test]
    fn test_haversine_antipodes_is_half_circumference() {
        let distance = haversine_km(at(0.0, 0.0), at(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.4567), "457m");
        assert_eq!(format_distance(0.9999), "1.0km");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(2.46), "2.5km");
        assert_eq!(format_distance(111.19), "111.2km");
    }

    #[test]
    fn test_coordinates_new_rejects_out_of_range() {
        assert!(Coordinates::new(45.0, 90.0).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_pair_requires_both() {
        assert_eq!(Coordinates::from_pair(Some(1.0), Some(2.0)), Some(at(1.0, 2.0)));
        assert_eq!(Coordinates::from_pair(Some(1.0), None), None);
        assert_eq!(Coordinates::from_pair(None, Some(2.0)), None);
    }

    #[test]
    fn test_box_uses_flat_latitude_delta() {
        let bbox = BoundingBox::around(at(0.0, 0.0), 111.0);
        assert!((bbox.max_lat - 1.0).abs() < 1e-6);
        assert!((bbox.min_lat + 1.0).abs() < 1e-6);
        // At the equator the exact extent is a little under the flat delta
        assert!((bbox.max_lon - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_box_widens_longitude_away_from_equator() {
        let bbox = BoundingBox::around(at(60.0, 10.0), 50.0);
        let lat_half = (bbox.max_lat - bbox.min_lat) / 2.0;
        let lon_half = (bbox.max_lon - bbox.min_lon) / 2.0;
        // cos(60°) = 0.5, so the east-west band roughly doubles
        assert!(lon_half > lat_half * 1.9, "lat {} lon {}", lat_half, lon_half);
    }

    #[test]
    fn test_box_goes_full_width_near_pole_and_antimeridian() {
        let polar = BoundingBox::around(at(89.9, 45.0), 50.0);
        assert_eq!((polar.min_lon, polar.max_lon), (-180.0, 180.0));
        assert_eq!(polar.max_lat, 90.0);

        let dateline = BoundingBox::around(at(-17.0, 179.95), 20.0);
        assert_eq!((dateline.min_lon, dateline.max_lon), (-180.0, 180.0));
    }

    #[test]
    fn test_box_is_superset_of_circle() {
        let latitudes = [-84.9, -70.0, -45.0, -6.2, 0.0, 23.5, 51.5, 70.0, 84.9];
        let longitudes = [-179.99, -122.4, 0.0, 106.8, 179.99];
        let radii = [0.05, 1.0, 5.0, 25.0, 150.0, 900.0];

        for &lat in &latitudes {
            for &lon in &longitudes {
                let center = at(lat, lon);
                for &radius in &radii {
                    let bbox = BoundingBox::around(center, radius);
                    for step in 0..72 {
                        let bearing = step as f64 * 5.0;
                        let edge = destination(center, bearing, radius * 0.9999);
                        assert!(haversine_km(center, edge) <= radius);
                        assert!(
                            bbox.contains(edge),
                            "center {:?} r {} bearing {} point {:?} box {:?}",
                            center,
                            radius,
                            bearing,
                            edge,
                            bbox
                        );
                    }
                }
            }
        }
    }
}
