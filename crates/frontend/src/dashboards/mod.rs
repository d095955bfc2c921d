pub mod d400_match_stats;

pub use d400_match_stats::ui::{MatchStatsDashboard, MatchStatsReport};
