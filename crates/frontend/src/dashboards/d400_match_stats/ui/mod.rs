pub mod dashboard;
pub mod report;

pub use dashboard::MatchStatsDashboard;
pub use report::MatchStatsReport;
