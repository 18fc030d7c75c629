use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter};
use crate::features::reports::services::ReportStore;
use crate::shared::geo::BoundingBox;

/// Service for report persistence
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new report in `pending` status
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports
                (id, profile_id, location, description, latitude, longitude, address, photo_urls, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING
                id, profile_id, location, description, latitude, longitude,
                address, photo_urls, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&data.profile_id)
        .bind(&data.location)
        .bind(&data.description)
        .bind(data.coordinates.map(|c| c.latitude))
        .bind(data.coordinates.map(|c| c.longitude))
        .bind(&data.address)
        .bind(&data.photo_urls)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        tracing::info!(
            "Created report: {} for profile: {} ({} photos)",
            report.id,
            report.profile_id,
            report.photo_urls.len()
        );

        Ok(report)
    }

    /// Get report by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, profile_id, location, description, latitude, longitude,
                address, photo_urls, status, created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// List reports, newest first
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, profile_id, location, description, latitude, longitude,
                address, photo_urls, status, created_at, updated_at
            FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR profile_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(filter.status)
        .bind(&filter.profile_id)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    /// Case-insensitive substring search over location label and address
    pub async fn search(&self, text: &str, filter: &ReportFilter) -> Result<Vec<Report>> {
        let pattern = format!("%{}%", escape_like(text));

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, profile_id, location, description, latitude, longitude,
                address, photo_urls, status, created_at, updated_at
            FROM reports
            WHERE (location ILIKE $1 ESCAPE '\' OR address ILIKE $1 ESCAPE '\')
              AND ($2::report_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(pattern)
        .bind(filter.status)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Search '{}' matched {} reports", text, reports.len());

        Ok(reports)
    }
}

#[async_trait]
impl ReportStore for ReportService {
    async fn fetch_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, profile_id, location, description, latitude, longitude,
                address, photo_urls, status, created_at, updated_at
            FROM reports
            WHERE latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
              AND ($5::report_status IS NULL OR status = $5)
              AND ($6::text IS NULL OR profile_id = $6)
            ORDER BY created_at DESC
            LIMIT $7
            "#,
        )
        .bind(bounds.min_lat)
        .bind(bounds.max_lat)
        .bind(bounds.min_lon)
        .bind(bounds.max_lon)
        .bind(filter.status)
        .bind(&filter.profile_id)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Bounding box query failed: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        tracing::debug!(
            "Bounding box [{:.4}, {:.4}] x [{:.4}, {:.4}] returned {} candidates",
            bounds.min_lat,
            bounds.max_lat,
            bounds.min_lon,
            bounds.max_lon,
            reports.len()
        );

        Ok(reports)
    }
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use crate::shared::geo::Coordinates;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Oak"), "Oak");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    async fn seed_profile(pool: &PgPool) {
        sqlx::query(
            "INSERT INTO profiles (id, display_name, role) VALUES ('citizen-1', 'Citizen One', 'citizen')",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    /// Insert a report created `age_secs` ago
    async fn seed_report(
        pool: &PgPool,
        location: &str,
        address: Option<&str>,
        coords: Option<(f64, f64)>,
        age_secs: i64,
    ) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO reports
                (id, profile_id, location, description, latitude, longitude, address, created_at)
            VALUES ($1, 'citizen-1', $2, 'Broken streetlight', $3, $4, $5,
                    NOW() - make_interval(secs => $6))
            "#,
        )
        .bind(id)
        .bind(location)
        .bind(coords.map(|c| c.0))
        .bind(coords.map(|c| c.1))
        .bind(address)
        .bind(age_secs as f64)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_search_matches_address_case_insensitively(pool: PgPool) {
        seed_profile(&pool).await;
        let oak = seed_report(&pool, "Near the market", Some("123 Oak Avenue"), None, 0).await;
        seed_report(&pool, "Elm Street", None, None, 10).await;
        seed_report(&pool, "Discount 100% off", None, None, 20).await;
        let service = ReportService::new(pool);

        let hits = service.search("oak", &ReportFilter::default()).await.unwrap();
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![oak]);

        let literal = service.search("0%", &ReportFilter::default()).await.unwrap();
        assert_eq!(literal.len(), 1);
        assert!(service
            .search("Maple", &ReportFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_fetch_in_bounds_skips_unlocated_and_outside_rows(pool: PgPool) {
        seed_profile(&pool).await;
        let older = seed_report(&pool, "Older", None, Some((37.7750, -122.4195)), 60).await;
        let newer = seed_report(&pool, "Newer", None, Some((37.7760, -122.4194)), 0).await;
        seed_report(&pool, "No position", None, None, 30).await;
        seed_report(&pool, "Far away", None, Some((-6.2, 106.8)), 10).await;
        let service = ReportService::new(pool);

        let center = Coordinates::new(37.7749, -122.4194).unwrap();
        let hits = service
            .fetch_in_bounds(&BoundingBox::around(center, 5.0), &ReportFilter::default())
            .await
            .unwrap();

        assert_eq!(
            hits.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![newer, older]
        );
        assert!(hits.iter().all(|r| r.status == ReportStatus::Pending));
    }
}
