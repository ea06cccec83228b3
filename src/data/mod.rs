//! Team statistics snapshot

pub mod stats;

// Re-export commonly used types
pub use stats::{
    LeagueTable, StatsDirectory, StatsError, TeamLookup, TeamStatRecord, TeamStatsSource,
};
