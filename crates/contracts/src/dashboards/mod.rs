pub mod d400_match_stats;
