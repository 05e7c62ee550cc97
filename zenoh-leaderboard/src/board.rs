//! In-memory leaderboard shared by the score server and the local cache

use serde::{Deserialize, Serialize};

use crate::record::{rank, ScoreRecord, ScoreSubmission, Username};

/// All accepted records, kept in leaderboard order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    records: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in any order
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        rank(&mut records);
        Self { records }
    }

    /// Store a submission, assigning id and missing timestamp
    pub fn insert(&mut self, submission: ScoreSubmission) -> ScoreRecord {
        let record = submission.into_record();
        let position = self
            .records
            .partition_point(|r| r.ranking_cmp(&record).is_lt());
        self.records.insert(position, record.clone());
        record
    }

    /// First `limit` records in leaderboard order
    pub fn top(&self, limit: usize) -> Vec<ScoreRecord> {
        self.records.iter().take(limit).cloned().collect()
    }

    /// Highest score of one player (most recent on ties)
    pub fn best_for(&self, username: &Username) -> Option<ScoreRecord> {
        self.records
            .iter()
            .find(|r| &r.username == username)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn submission(name: &str, score: u64, secs: i64) -> ScoreSubmission {
        ScoreSubmission::new(Username::new(name).unwrap(), score, 1000)
            .with_timestamp(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut board = Leaderboard::new();
        board.insert(submission("a", 100, 1));
        board.insert(submission("b", 900, 2));
        board.insert(submission("c", 100, 3));
        board.insert(submission("d", 400, 4));

        let names: Vec<&str> = board.records().iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_top_is_limited() {
        let mut board = Leaderboard::new();
        for i in 0..15 {
            board.insert(submission("a", i * 10, i as i64));
        }
        let top = board.top(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 140);
        assert_eq!(top[9].score, 50);
        assert_eq!(board.len(), 15);
    }

    #[test]
    fn test_best_for() {
        let mut board = Leaderboard::new();
        board.insert(submission("ann", 300, 1));
        board.insert(submission("bob", 800, 2));
        board.insert(submission("ann", 500, 3));
        board.insert(submission("ann", 500, 4));

        let best = board.best_for(&Username::new("ann").unwrap()).unwrap();
        assert_eq!(best.score, 500);
        assert_eq!(best.timestamp.timestamp(), 4);
        assert!(board.best_for(&Username::new("zed").unwrap()).is_none());
    }

    #[test]
    fn test_from_records_ranks() {
        let mut board = Leaderboard::new();
        let low = board.insert(submission("a", 1, 1));
        let high = board.insert(submission("b", 2, 2));
        let rebuilt = Leaderboard::from_records(vec![low, high.clone()]);
        assert_eq!(rebuilt.records()[0], high);
    }
}
