//! Client of the score server
//!
//! Every operation is a single zenoh query with a timeout; there is no retry.
//! An error reply maps to [`LeaderboardError::Rejected`], an empty reply
//! stream (no server, or timeout) to [`LeaderboardError::NoResponse`].

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use zenoh::bytes::ZBytes;
use zenoh::key_expr::KeyExpr;

use crate::codec::{decode, decode_text, encode};
use crate::config::LeaderboardConfig;
use crate::error::{LeaderboardError, Result};
use crate::keyexpr::ScoresKeyexpr;
use crate::record::{ScoreRecord, ScoreSubmission, SubmitReply, Username};
use crate::sink::ScoreSink;

/// Score store reached through a zenoh session
#[derive(Clone)]
pub struct RemoteScoreStore {
    session: zenoh::Session,
    config: LeaderboardConfig,
}

impl RemoteScoreStore {
    pub fn new(session: zenoh::Session, config: LeaderboardConfig) -> Self {
        Self { session, config }
    }

    /// Send one query and return the payload of the first reply
    async fn query(&self, target: ScoresKeyexpr, payload: Option<ZBytes>) -> Result<ZBytes> {
        let keyexpr: KeyExpr = target.try_into()?;
        tracing::debug!("Querying score server on {}", keyexpr);

        let mut get = self
            .session
            .get(keyexpr.clone())
            .timeout(Duration::from_millis(self.config.query_timeout_ms));
        if let Some(payload) = payload {
            get = get.payload(payload);
        }
        let replies = get.await?;

        match replies.recv_async().await {
            Ok(reply) => match reply.result() {
                Ok(sample) => Ok(sample.payload().clone()),
                Err(reply_err) => {
                    let reason = decode_text(reply_err.payload())
                        .unwrap_or_else(|_| "unreadable error reply".to_string());
                    Err(LeaderboardError::Rejected(reason))
                }
            },
            Err(_) => Err(LeaderboardError::NoResponse(format!(
                "no score server answered on {}",
                keyexpr
            ))),
        }
    }

    fn board_keyexpr(&self) -> ScoresKeyexpr {
        ScoresKeyexpr::board(&self.config.keyexpr_prefix)
    }
}

impl ScoreSink for RemoteScoreStore {
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'_, Result<SubmitReply>> {
        async move {
            let payload = encode(&submission)?;
            let bytes = self.query(self.board_keyexpr(), Some(payload)).await?;
            let reply: SubmitReply = decode(&bytes)?;
            tracing::info!(
                "Score {} of {} saved as {}",
                reply.saved.score,
                reply.saved.username,
                reply.saved.id
            );
            Ok(reply)
        }
        .boxed()
    }

    fn top_scores(&self) -> BoxFuture<'_, Result<Vec<ScoreRecord>>> {
        async move {
            let bytes = self.query(self.board_keyexpr(), None).await?;
            let mut top_scores: Vec<ScoreRecord> = decode(&bytes)?;
            top_scores.truncate(self.config.top_limit);
            Ok(top_scores)
        }
        .boxed()
    }

    fn best_for<'a>(&'a self, username: &'a Username) -> BoxFuture<'a, Result<Option<ScoreRecord>>> {
        async move {
            let target = ScoresKeyexpr::best(&self.config.keyexpr_prefix, username.clone());
            let bytes = self.query(target, None).await?;
            decode(&bytes)
        }
        .boxed()
    }
}
