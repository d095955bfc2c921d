use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Filter for the match summary (team, date range)
///
/// Unset fields are skipped on serialization, so a query built from a
/// `FilterSet` never carries `team=` with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Start date in format "YYYY-MM-DD"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End date in format "YYYY-MM-DD"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl FilterSet {
    /// Build a filter from raw form values; empty strings become `None`
    pub fn from_raw(team: &str, start: &str, end: &str) -> Self {
        Self {
            team: non_empty(team),
            start: non_empty(start),
            end: non_empty(end),
        }
    }

    /// Same filter with every `Some("")` collapsed to `None`
    pub fn normalized(&self) -> Self {
        Self {
            team: self.team.as_deref().and_then(non_empty),
            start: self.start.as_deref().and_then(non_empty),
            end: self.end.as_deref().and_then(non_empty),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Per-team statistics inside a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub matches: u64,
    pub wins: u64,
    pub runs: u64,
}

/// Response of `GET /api/summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryAggregate {
    pub total_matches: u64,
    pub total_runs: u64,
    /// Team name -> stats, ordered by team name; missing or null means no teams
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: BTreeMap<String, TeamStats>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SummaryAggregate {
    /// Check that no team has more wins than matches
    pub fn validate(&self) -> Result<(), String> {
        for (team, stats) in &self.teams {
            if stats.wins > stats.matches {
                return Err(format!(
                    "team '{}' has {} wins in {} matches",
                    team, stats.wins, stats.matches
                ));
            }
        }
        Ok(())
    }

    /// Team names in map order
    pub fn team_names(&self) -> Vec<String> {
        self.teams.keys().cloned().collect()
    }

    pub fn wins_series(&self) -> Vec<u64> {
        self.teams.values().map(|s| s.wins).collect()
    }

    pub fn runs_series(&self) -> Vec<u64> {
        self.teams.values().map(|s| s.runs).collect()
    }
}

/// Response of `POST /api/upload` without `confirm`
///
/// `errors` and `preview` are opaque row objects produced by the backend.
/// `error` is set when the backend rejects the file before row validation
/// (missing file, empty file, wrong headers).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadPreviewResponse {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub preview: Vec<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/upload` with `confirm=1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadCommitResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Anything else the backend sent back, kept for display
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UploadCommitResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}
