mod contribution_service;

pub use contribution_service::ContributionService;
