use std::sync::Arc;

use tokio::task::JoinHandle;
use zenoh_leaderboard::{ScoreRecord, ScoreSink, ScoreSubmission, Username};

use crate::game::GameResult;

/// Leaderboard news for the frontend
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardUpdate {
    /// Fresh top list
    Loaded(Vec<ScoreRecord>),
    /// A finished game was stored
    Submitted {
        game_id: u64,
        saved: ScoreRecord,
        top_scores: Vec<ScoreRecord>,
    },
}

/// Sends finished games to a [`ScoreSink`] without blocking the game loop
///
/// Each game is submitted at most once. Answers arrive on the update
/// channel whenever the sink completes, however late.
pub struct ScoreReporter {
    sink: Arc<dyn ScoreSink>,
    updates: flume::Sender<LeaderboardUpdate>,
    last_reported: Option<u64>,
}

impl ScoreReporter {
    pub fn new(sink: Arc<dyn ScoreSink>) -> (Self, flume::Receiver<LeaderboardUpdate>) {
        let (updates, receiver) = flume::unbounded();
        let reporter = Self {
            sink,
            updates,
            last_reported: None,
        };
        (reporter, receiver)
    }

    /// Fetch the top list in the background
    pub fn refresh(&self) -> JoinHandle<()> {
        let sink = self.sink.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            match sink.top_scores().await {
                Ok(top_scores) => {
                    let _ = updates.send(LeaderboardUpdate::Loaded(top_scores));
                }
                Err(e) => tracing::warn!("Failed to load leaderboard: {}", e),
            }
        })
    }

    /// Submit a finished game; returns `None` if this game was already reported
    pub fn report(&mut self, result: GameResult, username: &Username) -> Option<JoinHandle<()>> {
        if self.last_reported.is_some_and(|last| result.game_id <= last) {
            tracing::debug!("Game {} already reported", result.game_id);
            return None;
        }
        self.last_reported = Some(result.game_id);

        let submission = ScoreSubmission::new(username.clone(), result.score, result.play_time_ms);
        let sink = self.sink.clone();
        let updates = self.updates.clone();
        tracing::info!(
            "Reporting game {} of {}: score {}",
            result.game_id,
            username,
            result.score
        );
        Some(tokio::spawn(async move {
            match sink.submit(submission).await {
                Ok(reply) => {
                    let _ = updates.send(LeaderboardUpdate::Submitted {
                        game_id: result.game_id,
                        saved: reply.saved,
                        top_scores: reply.top_scores,
                    });
                }
                Err(e) => tracing::warn!("Failed to submit game {}: {}", result.game_id, e),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenoh_leaderboard::LocalScoreStore;

    fn result(game_id: u64, score: u64) -> GameResult {
        GameResult {
            game_id,
            score,
            lines: 3,
            level: 1,
            play_time_ms: 42_000,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_report_once_per_game() {
        let store = Arc::new(LocalScoreStore::in_memory());
        let (mut reporter, updates) = ScoreReporter::new(store.clone());
        let ann = Username::new("ann").unwrap();

        let handle = reporter.report(result(1, 500), &ann).unwrap();
        assert!(reporter.report(result(1, 500), &ann).is_none());
        handle.await.unwrap();
        assert_eq!(store.len(), 1);

        match updates.recv_async().await.unwrap() {
            LeaderboardUpdate::Submitted {
                game_id,
                saved,
                top_scores,
            } => {
                assert_eq!(game_id, 1);
                assert_eq!(saved.score, 500);
                assert_eq!(saved.time, 42_000);
                assert_eq!(saved.username, ann);
                assert_eq!(top_scores.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }

        // The next game is a new submission
        reporter.report(result(2, 900), &ann).unwrap().await.unwrap();
        assert_eq!(store.len(), 2);
        assert!(updates.try_recv().is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_refresh_loads_top_list() {
        let store = Arc::new(LocalScoreStore::in_memory());
        store.add(ScoreSubmission::new(Username::new("bob").unwrap(), 300, 1000));
        let (reporter, updates) = ScoreReporter::new(store);

        reporter.refresh().await.unwrap();
        match updates.recv_async().await.unwrap() {
            LeaderboardUpdate::Loaded(top) => {
                assert_eq!(top.len(), 1);
                assert_eq!(top[0].username.as_str(), "bob");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
