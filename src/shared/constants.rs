/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// GEO CONSTANTS
// =============================================================================

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude
pub const KM_PER_DEGREE: f64 = 111.0;

/// Radius used by the nearby search when the caller gives none
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

/// Largest radius accepted by the nearby search
pub const MAX_SEARCH_RADIUS_KM: f64 = 2000.0;

// =============================================================================
// REPORT CONSTANTS
// =============================================================================

/// Upper bound for `limit` on report queries
pub const MAX_REPORT_LIMIT: i64 = 500;

/// Image types accepted as report photos, with the extension used for storage keys
pub const ALLOWED_PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
];
