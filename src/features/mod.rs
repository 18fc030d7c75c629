pub mod auth;
pub mod contributions;
pub mod dashboard;
pub mod locator;
pub mod profiles;
pub mod reports;
