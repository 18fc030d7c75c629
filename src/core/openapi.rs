use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::contributions::{
    dtos as contributions_dtos, handlers as contributions_handlers,
};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::locator::{
    dtos as locator_dtos, handlers as locator_handlers, models as locator_models,
};
use crate::features::profiles::{
    dtos as profiles_dtos, handlers as profiles_handlers, models as profiles_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        auth::handler::sign_out,
        // Profiles
        profiles_handlers::create_profile,
        profiles_handlers::get_my_profile,
        profiles_handlers::get_profile,
        profiles_handlers::update_profile,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::search_reports,
        reports_handlers::get_report,
        // Locations
        locator_handlers::get_my_location,
        locator_handlers::list_nearby_reports,
        // Contributions
        contributions_handlers::create_contribution,
        contributions_handlers::list_contributions,
        // Dashboard
        dashboard_handlers::get_summary,
        dashboard_handlers::list_reports,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::dto::SignOutResponseDto,
            // Profiles
            profiles_models::ProfileRole,
            profiles_models::ProfileSource,
            profiles_dtos::CreateProfileDto,
            profiles_dtos::UpdateProfileDto,
            profiles_dtos::ProfileResponseDto,
            profiles_dtos::ResolvedProfileDto,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::SubmitReportDto,
            reports_dtos::ReportResponseDto,
            // Locations
            locator_models::DeviceError,
            locator_models::PositionSource,
            locator_dtos::UserLocationDto,
            locator_dtos::NearbyReportDto,
            locator_dtos::NearbyResponseDto,
            // Contributions
            contributions_dtos::CreateContributionDto,
            contributions_dtos::ContributionResponseDto,
            contributions_dtos::ContributionSummaryDto,
            contributions_dtos::ReportContributionsDto,
            // Dashboard
            dashboard_dtos::DashboardSummaryDto,
            dashboard_dtos::DashboardReportDto,
            // Wrapped responses
            ApiResponse<auth::dto::MeResponseDto>,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
            ApiResponse<profiles_dtos::ResolvedProfileDto>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<locator_dtos::UserLocationDto>,
            ApiResponse<locator_dtos::NearbyResponseDto>,
            ApiResponse<contributions_dtos::ContributionResponseDto>,
            ApiResponse<contributions_dtos::ReportContributionsDto>,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
            ApiResponse<Vec<dashboard_dtos::DashboardReportDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Current principal and sign-out"),
        (name = "profiles", description = "Onboarding and profile management"),
        (name = "reports", description = "Report submission, listing, search and proximity search"),
        (name = "locations", description = "Caller position"),
        (name = "contributions", description = "Financial contributions toward reports"),
        (name = "dashboard", description = "Contractor dashboard"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Warga Lapor API",
        version = "0.1.0",
        description = "Community incident reporting API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/me",
            "/api/auth/sign-out",
            "/api/profiles",
            "/api/profiles/me",
            "/api/profiles/{id}",
            "/api/reports",
            "/api/reports/search",
            "/api/reports/nearby",
            "/api/reports/{id}",
            "/api/reports/{id}/contributions",
            "/api/locations/me",
            "/api/dashboard/summary",
            "/api/dashboard/reports",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{} undocumented", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
