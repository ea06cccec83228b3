//! Team statistics loading
//!
//! Statistics live in one JSON file per league (`nba.json`, `nfl.json`, ...)
//! inside a data directory. Files are read once at startup into an
//! immutable snapshot; a missing or malformed file simply means that league
//! has no table and projections use pseudo-ratings instead.

use crate::core::league::League;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors reading a statistics file
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// External statistics for one team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatRecord {
    #[serde(default, alias = "off_rating")]
    pub off_rating: Option<f64>,
    #[serde(default, alias = "def_rating")]
    pub def_rating: Option<f64>,
    #[serde(default)]
    pub pace: Option<f64>,
    #[serde(default, alias = "home_ppg")]
    pub home_ppg: Option<f64>,
    #[serde(default, alias = "away_ppg")]
    pub away_ppg: Option<f64>,
    #[serde(default)]
    pub ppg: Option<f64>,
    #[serde(default, alias = "opp_ppg")]
    pub opp_ppg: Option<f64>,
    #[serde(default, alias = "recent_ppg")]
    pub recent_ppg: Option<f64>,
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

impl TeamStatRecord {
    /// Offensive and defensive ratings, if both are usable
    pub fn ratings(&self) -> Option<(f64, f64)> {
        Some((positive(self.off_rating)?, positive(self.def_rating)?))
    }

    /// Pace, defaulting to the neutral 100
    pub fn pace_or_neutral(&self) -> f64 {
        positive(self.pace).unwrap_or(100.0)
    }

    pub fn home_split(&self) -> Option<f64> {
        positive(self.home_ppg)
    }

    pub fn away_split(&self) -> Option<f64> {
        positive(self.away_ppg)
    }
}

/// Outcome of a strict team lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamLookup<'a> {
    Usable(&'a TeamStatRecord),
    /// Present, but offense or defense is missing, zero or non-finite
    Unusable,
    Missing,
}

/// One league's statistics file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueTable {
    #[serde(default)]
    pub avg_points: Option<f64>,
    #[serde(default)]
    pub std_dev_points: Option<f64>,
    #[serde(default)]
    pub teams: BTreeMap<String, TeamStatRecord>,
}

impl LeagueTable {
    /// Load a table from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StatsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StatsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Base points per game override
    pub fn base_ppg(&self) -> Option<f64> {
        positive(self.avg_points)
    }

    /// Base standard deviation override
    pub fn base_sd(&self) -> Option<f64> {
        positive(self.std_dev_points)
    }

    /// Look up a team by exact or case-insensitive name
    pub fn lookup(&self, name: &str) -> TeamLookup<'_> {
        let record = self.teams.get(name).or_else(|| {
            let target = name.trim().to_lowercase();
            self.teams
                .iter()
                .find(|(key, _)| key.trim().to_lowercase() == target)
                .map(|(_, record)| record)
        });
        match record {
            Some(record) if record.ratings().is_some() => TeamLookup::Usable(record),
            Some(_) => TeamLookup::Unusable,
            None => TeamLookup::Missing,
        }
    }

    /// A team with usable ratings, if there is one
    pub fn team(&self, name: &str) -> Option<&TeamStatRecord> {
        match self.lookup(name) {
            TeamLookup::Usable(record) => Some(record),
            TeamLookup::Unusable | TeamLookup::Missing => None,
        }
    }

    /// Flexible lookup: exact key, case-insensitive key, then substring
    /// either way. Returns the matched key with its record.
    pub fn find_team(&self, query: &str) -> Option<(&str, &TeamStatRecord)> {
        if let Some((key, record)) = self.teams.get_key_value(query) {
            return Some((key.as_str(), record));
        }

        let target = query.trim().to_lowercase();
        if target.is_empty() {
            return None;
        }

        let mut partial = None;
        for (key, record) in &self.teams {
            let k = key.trim().to_lowercase();
            if k == target {
                return Some((key.as_str(), record));
            }
            if partial.is_none() && (k.contains(&target) || target.contains(&k)) {
                partial = Some((key.as_str(), record));
            }
        }
        partial
    }

    /// League-average offensive and defensive ratings over teams with usable ratings
    pub fn rating_averages(&self) -> Option<(f64, f64)> {
        let (count, off_sum, def_sum) = self
            .teams
            .values()
            .filter_map(TeamStatRecord::ratings)
            .fold((0usize, 0.0, 0.0), |(n, o, d), (off, def)| (n + 1, o + off, d + def));

        if count == 0 {
            return None;
        }
        Some((off_sum / count as f64, def_sum / count as f64))
    }
}

/// Read-only source of league statistics
pub trait TeamStatsSource {
    fn league_table(&self, league: League) -> Option<&LeagueTable>;
}

/// Statistics snapshot loaded from a data directory
#[derive(Debug, Clone, Default)]
pub struct StatsDirectory {
    tables: HashMap<League, LeagueTable>,
}

impl StatsDirectory {
    /// A snapshot with no tables; every projection uses pseudo-ratings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `<league>.json` present in `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let mut tables = HashMap::new();

        for league in League::ALL {
            let path = dir.join(format!("{}.json", league.code().to_lowercase()));
            if !path.exists() {
                debug!("No statistics file for {} at {:?}", league, path);
                continue;
            }

            match LeagueTable::load(&path) {
                Ok(table) => {
                    info!("Loaded {} teams for {}", table.teams.len(), league);
                    tables.insert(league, table);
                }
                Err(e) => {
                    warn!("Ignoring statistics for {}: {}", league, e);
                }
            }
        }

        Self { tables }
    }

    /// Leagues with a loaded table, in canonical order
    pub fn leagues(&self) -> Vec<League> {
        League::ALL
            .into_iter()
            .filter(|l| self.tables.contains_key(l))
            .collect()
    }
}

impl TeamStatsSource for StatsDirectory {
    fn league_table(&self, league: League) -> Option<&LeagueTable> {
        self.tables.get(&league)
    }
}

impl FromIterator<(League, LeagueTable)> for StatsDirectory {
    fn from_iter<I: IntoIterator<Item = (League, LeagueTable)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn record(off: f64, def: f64) -> TeamStatRecord {
        TeamStatRecord {
            off_rating: Some(off),
            def_rating: Some(def),
            ..Default::default()
        }
    }

    fn sample_table() -> LeagueTable {
        let mut teams = BTreeMap::new();
        teams.insert("Carolina Panthers".to_string(), record(110.0, 112.0));
        teams.insert("Kansas City Chiefs".to_string(), record(118.0, 106.0));
        teams.insert("Broken".to_string(), record(0.0, 108.0));
        LeagueTable {
            avg_points: Some(23.0),
            std_dev_points: None,
            teams,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("edgeline_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_team_exact_and_case_insensitive() {
        let table = sample_table();
        assert!(table.team("Carolina Panthers").is_some());
        assert!(table.team("carolina panthers").is_some());
        assert!(table.team("Carolina").is_none());
    }

    #[test]
    fn test_team_with_invalid_ratings_is_absent() {
        let table = sample_table();
        assert!(table.team("Broken").is_none());
        assert_eq!(table.lookup("broken"), TeamLookup::Unusable);
        assert_eq!(table.lookup("Packers"), TeamLookup::Missing);
        assert!(matches!(
            table.lookup("Kansas City Chiefs"),
            TeamLookup::Usable(r) if r.off_rating == Some(118.0)
        ));
    }

    #[test]
    fn test_find_team_substring() {
        let table = sample_table();
        let (key, _) = table.find_team("Carolina").unwrap();
        assert_eq!(key, "Carolina Panthers");
        let (key, _) = table.find_team("kansas city chiefs").unwrap();
        assert_eq!(key, "Kansas City Chiefs");
        assert!(table.find_team("Packers").is_none());
        assert!(table.find_team("   ").is_none());
    }

    #[test]
    fn test_rating_averages_skip_unusable() {
        let (off, def) = sample_table().rating_averages().unwrap();
        assert_approx_eq!(off, 114.0);
        assert_approx_eq!(def, 109.0);
        assert!(LeagueTable::default().rating_averages().is_none());
    }

    #[test]
    fn test_parse_camel_and_snake_case() {
        let json = r#"{
            "avgPoints": 115.0,
            "teams": {
                "Lakers": {"offRating": 116.2, "defRating": 113.1, "pace": 101.5, "homePpg": 118.0},
                "Celtics": {"off_rating": 120.4, "def_rating": 110.2, "away_ppg": 117.5}
            }
        }"#;
        let table: LeagueTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.base_ppg(), Some(115.0));
        assert_eq!(table.base_sd(), None);
        assert_eq!(table.team("Lakers").unwrap().home_split(), Some(118.0));
        assert_eq!(table.team("Celtics").unwrap().away_split(), Some(117.5));
        assert_eq!(table.team("Celtics").unwrap().pace_or_neutral(), 100.0);
    }

    #[test]
    fn test_directory_load_skips_missing_and_malformed() {
        let dir = scratch_dir("stats_load");
        fs::write(
            dir.join("nba.json"),
            r#"{"teams": {"Lakers": {"offRating": 114.0, "defRating": 112.0}}}"#,
        )
        .unwrap();
        fs::write(dir.join("nfl.json"), "{ not json").unwrap();

        let stats = StatsDirectory::load(&dir);
        assert_eq!(stats.leagues(), vec![League::Nba]);
        assert!(stats.league_table(League::Nfl).is_none());
        assert!(stats.league_table(League::Nba).unwrap().team("Lakers").is_some());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = scratch_dir("stats_parse");
        let path = dir.join("mlb.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = LeagueTable::load(&path).unwrap_err();
        assert!(matches!(err, StatsError::Parse { .. }));
        assert!(err.to_string().contains("mlb.json"));
        let _ = fs::remove_dir_all(&dir);
    }
}
