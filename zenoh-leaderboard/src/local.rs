//! Process-local score store, optionally backed by a JSON file
//!
//! Used by the game as its fallback cache when the score server cannot be
//! reached, and by the score server as its authoritative storage.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt};

use crate::board::Leaderboard;
use crate::error::Result;
use crate::record::{ScoreRecord, ScoreSubmission, SubmitReply, Username, TOP_SCORES_LIMIT};
use crate::sink::ScoreSink;

/// Local leaderboard with add-one and top-N queries
#[derive(Debug)]
pub struct LocalScoreStore {
    board: Mutex<Leaderboard>,
    path: Option<PathBuf>,
    top_limit: usize,
}

impl LocalScoreStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            board: Mutex::new(Leaderboard::new()),
            path: None,
            top_limit: TOP_SCORES_LIMIT,
        }
    }

    /// Store persisted at `path`
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// logged and also starts empty; it is overwritten on the next add.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let board = match Self::load(&path) {
            Ok(Some(board)) => {
                tracing::info!("Loaded {} score(s) from {}", board.len(), path.display());
                board
            }
            Ok(None) => {
                tracing::debug!("No score file at {}, starting empty", path.display());
                Leaderboard::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable score file {}: {}", path.display(), e);
                Leaderboard::new()
            }
        };
        Self {
            board: Mutex::new(board),
            path: Some(path),
            top_limit: TOP_SCORES_LIMIT,
        }
    }

    /// Set the top list size (at least one record)
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit.max(1);
        self
    }

    fn load(path: &Path) -> Result<Option<Leaderboard>> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let records: Vec<ScoreRecord> = serde_json::from_str(&content)?;
                Ok(Some(Leaderboard::from_records(records)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn board(&self) -> MutexGuard<'_, Leaderboard> {
        self.board.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store one submission
    ///
    /// The record is kept in memory even if writing the file fails.
    pub fn add(&self, submission: ScoreSubmission) -> ScoreRecord {
        let record = self.board().insert(submission);
        tracing::debug!("Stored score {} for {}", record.score, record.username);
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to write score file: {}", e);
        }
        record
    }

    /// Write all records to the backing file, if any
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&*self.board())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Best `limit` records in leaderboard order
    pub fn top(&self, limit: usize) -> Vec<ScoreRecord> {
        self.board().top(limit)
    }

    /// Top list using the configured limit
    pub fn leaderboard(&self) -> Vec<ScoreRecord> {
        self.top(self.top_limit)
    }

    pub fn best_for(&self, username: &Username) -> Option<ScoreRecord> {
        self.board().best_for(username)
    }

    pub fn len(&self) -> usize {
        self.board().len()
    }

    pub fn is_empty(&self) -> bool {
        self.board().is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ScoreSink for LocalScoreStore {
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'_, Result<SubmitReply>> {
        async move {
            let saved = self.add(submission);
            Ok(SubmitReply {
                saved,
                top_scores: self.leaderboard(),
            })
        }
        .boxed()
    }

    fn top_scores(&self) -> BoxFuture<'_, Result<Vec<ScoreRecord>>> {
        async move { Ok(self.leaderboard()) }.boxed()
    }

    fn best_for<'a>(&'a self, username: &'a Username) -> BoxFuture<'a, Result<Option<ScoreRecord>>> {
        async move { Ok(LocalScoreStore::best_for(self, username)) }.boxed()
    }
}
