mod report;

pub use report::{CreateReport, Report, ReportFilter, ReportStatus};

#[cfg(test)]
pub(crate) use report::fixtures;
