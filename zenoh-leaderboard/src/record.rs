/// Score records and the ranking rules shared by every store
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, Result};

/// Number of records in a leaderboard
pub const TOP_SCORES_LIMIT: usize = 10;

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 32;

/// Identity used when the player never chose a name
pub const DEFAULT_USERNAME: &str = "Player";

/// Unique record identifier assigned by the store that accepted the record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreId(String);

impl ScoreId {
    /// Generate a new identifier
    /// Uses base58 encoding of UUID to stay short and keyexpr-safe
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let encoded = bs58::encode(uuid.as_bytes()).into_string();
        ScoreId(encoded.chars().take(16).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player identity attached to every score
///
/// Usernames are embedded in key expressions (`<prefix>/scores/<username>/best`)
/// so they must form a single keyexpr chunk:
/// - Non-empty after trimming, at most [`MAX_USERNAME_LEN`] characters
/// - Cannot contain: / * $ ? # @
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create from user input; surrounding whitespace is trimmed
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        Self::validate(name)?;
        Ok(Username(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(LeaderboardError::InvalidUsername(
                "Username cannot be empty".to_string(),
            ));
        }
        if s.chars().count() > MAX_USERNAME_LEN {
            return Err(LeaderboardError::InvalidUsername(format!(
                "Username '{}' is longer than {} characters",
                s, MAX_USERNAME_LEN
            )));
        }
        for ch in s.chars() {
            if matches!(ch, '/' | '*' | '$' | '?' | '#' | '@') {
                return Err(LeaderboardError::InvalidUsername(format!(
                    "Username '{}' contains invalid character '{}'",
                    s, ch
                )));
            }
        }
        Ok(())
    }
}

impl Default for Username {
    fn default() -> Self {
        Username(DEFAULT_USERNAME.to_string())
    }
}

impl TryFrom<String> for Username {
    type Error = LeaderboardError;

    fn try_from(value: String) -> Result<Self> {
        Username::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub username: Username,
    pub score: u64,
    /// Play time in milliseconds, pauses excluded
    pub time: u64,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Leaderboard order: score descending, then most recent first
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}

/// Score as sent by a finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: Username,
    pub score: u64,
    pub time: u64,
    /// Assigned by the store when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ScoreSubmission {
    pub fn new(username: Username, score: u64, time: u64) -> Self {
        Self {
            username,
            score,
            time,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Turn into a stored record with a fresh id
    pub fn into_record(self) -> ScoreRecord {
        ScoreRecord {
            id: ScoreId::generate(),
            username: self.username,
            score: self.score,
            time: self.time,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Answer to a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReply {
    /// The record as stored
    pub saved: ScoreRecord,
    /// Leaderboard after the submission
    pub top_scores: Vec<ScoreRecord>,
}

/// Sort records in leaderboard order
pub fn rank(records: &mut [ScoreRecord]) {
    records.sort_by(ScoreRecord::ranking_cmp);
}

/// Format a play time as `MM:SS`, or `--:--` when unknown
pub fn format_play_time(time_ms: u64) -> String {
    if time_ms == 0 {
        return "--:--".to_string();
    }
    let minutes = time_ms / 60_000;
    let seconds = (time_ms % 60_000) / 1000;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(score: u64, secs: i64) -> ScoreRecord {
        ScoreRecord {
            id: ScoreId::generate(),
            username: Username::new("ann").unwrap(),
            score,
            time: 1000,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_score_id_generation() {
        let id1 = ScoreId::generate();
        let id2 = ScoreId::generate();
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
        assert!(id1.as_str().len() <= 16);
    }

    #[test]
    fn test_username_trimmed() {
        assert_eq!(Username::new("  bob ").unwrap().as_str(), "bob");
    }

    #[test]
    fn test_username_invalid() {
        assert!(Username::new("").is_err());
        assert!(Username::new("   ").is_err());
        assert!(Username::new("has/slash").is_err());
        assert!(Username::new("has*star").is_err());
        assert!(Username::new("has$dollar").is_err());
        assert!(Username::new("has?question").is_err());
        assert!(Username::new("has#hash").is_err());
        assert!(Username::new("has@at").is_err());
        assert!(Username::new("x".repeat(MAX_USERNAME_LEN + 1)).is_err());
        assert!(Username::new("x".repeat(MAX_USERNAME_LEN)).is_ok());
    }

    #[test]
    fn test_username_default() {
        assert_eq!(Username::default().as_str(), "Player");
    }

    #[test]
    fn test_username_rejected_when_deserializing() {
        let json = r#"{"username":"a/b","score":1,"time":2}"#;
        assert!(serde_json::from_str::<ScoreSubmission>(json).is_err());
    }

    #[test]
    fn test_negative_score_rejected() {
        let json = r#"{"username":"ann","score":-5,"time":2}"#;
        assert!(serde_json::from_str::<ScoreSubmission>(json).is_err());
    }

    #[test]
    fn test_submission_without_timestamp() {
        let json = r#"{"username":"ann","score":300,"time":61000}"#;
        let submission: ScoreSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.timestamp, None);

        let before = Utc::now();
        let record = submission.into_record();
        assert!(record.timestamp >= before);
        assert_eq!(record.score, 300);
        assert_eq!(record.username.as_str(), "ann");
    }

    #[test]
    fn test_submission_keeps_timestamp() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = ScoreSubmission::new(Username::default(), 10, 20)
            .with_timestamp(ts)
            .into_record();
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn test_rank_score_then_recency() {
        let mut records = vec![record(100, 10), record(500, 5), record(100, 20), record(800, 1)];
        rank(&mut records);
        let order: Vec<(u64, i64)> = records
            .iter()
            .map(|r| (r.score, r.timestamp.timestamp()))
            .collect();
        assert_eq!(order, vec![(800, 1), (500, 5), (100, 20), (100, 10)]);
    }

    #[test]
    fn test_format_play_time() {
        assert_eq!(format_play_time(0), "--:--");
        assert_eq!(format_play_time(61_500), "01:01");
        assert_eq!(format_play_time(3_599_000), "59:59");
        assert_eq!(format_play_time(6_000_000), "100:00");
    }
}
