use std::sync::Arc;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;
use crate::local::LocalScoreStore;
use crate::record::{ScoreRecord, ScoreSubmission, SubmitReply, Username};

/// Capability to persist finished games and read the leaderboard
///
/// The game only talks to this trait, never to a transport. Methods return
/// boxed futures so implementations can be shared as `Arc<dyn ScoreSink>`.
pub trait ScoreSink: Send + Sync {
    /// Store one result and return the stored record with the refreshed top list
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'_, Result<SubmitReply>>;

    /// Top list, ranked by score then recency
    fn top_scores(&self) -> BoxFuture<'_, Result<Vec<ScoreRecord>>>;

    /// Highest score of one player, if any
    fn best_for<'a>(&'a self, username: &'a Username) -> BoxFuture<'a, Result<Option<ScoreRecord>>>;
}

/// Remote store with a local fallback
///
/// - `submit` always records the result locally first, then submits remotely.
///   When the remote submit fails the remote top list is fetched instead, and
///   when that fails too the local cache answers.
/// - `top_scores` and `best_for` ask the remote store and fall back to the
///   local cache on failure.
///
/// Failures are logged and never returned: every call resolves to `Ok`.
pub struct FallbackScoreSink {
    remote: Arc<dyn ScoreSink>,
    local: Arc<LocalScoreStore>,
}

impl FallbackScoreSink {
    pub fn new(remote: Arc<dyn ScoreSink>, local: Arc<LocalScoreStore>) -> Self {
        Self { remote, local }
    }
}

impl ScoreSink for FallbackScoreSink {
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'_, Result<SubmitReply>> {
        async move {
            // Same timestamp on both sides
            let submission = match submission.timestamp {
                Some(_) => submission,
                None => submission.with_timestamp(Utc::now()),
            };
            let saved = self.local.add(submission.clone());

            match self.remote.submit(submission).await {
                Ok(reply) => Ok(reply),
                Err(e) => {
                    tracing::warn!("Failed to save score to server: {}", e);
                    let top_scores = match self.remote.top_scores().await {
                        Ok(top_scores) => top_scores,
                        Err(e) => {
                            tracing::warn!("Failed to fetch scores from server: {}", e);
                            self.local.leaderboard()
                        }
                    };
                    Ok(SubmitReply { saved, top_scores })
                }
            }
        }
        .boxed()
    }

    fn top_scores(&self) -> BoxFuture<'_, Result<Vec<ScoreRecord>>> {
        async move {
            match self.remote.top_scores().await {
                Ok(top_scores) => Ok(top_scores),
                Err(e) => {
                    tracing::warn!("Failed to fetch scores from server: {}", e);
                    Ok(self.local.leaderboard())
                }
            }
        }
        .boxed()
    }

    fn best_for<'a>(&'a self, username: &'a Username) -> BoxFuture<'a, Result<Option<ScoreRecord>>> {
        async move {
            match self.remote.best_for(username).await {
                Ok(best) => Ok(best),
                Err(e) => {
                    tracing::warn!("Failed to fetch best score of {} from server: {}", username, e);
                    Ok(self.local.best_for(username))
                }
            }
        }
        .boxed()
    }
}
