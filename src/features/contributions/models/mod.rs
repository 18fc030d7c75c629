mod contribution;

pub use contribution::{Contribution, ContributionSummary, CreateContribution};
