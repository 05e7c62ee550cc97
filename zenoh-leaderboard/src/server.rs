//! Queryable side of the score protocol
//!
//! ## Protocol Overview
//!
//! The server declares a SINGLE queryable on `<prefix>/scores/**` and
//! dispatches on the query keyexpr and the presence of a payload:
//!
//! | Query keyexpr                       | Payload          | Reply                        |
//! |-------------------------------------|------------------|------------------------------|
//! | `<prefix>/scores`                   | none             | top list (JSON array)        |
//! | `<prefix>/scores`                   | ScoreSubmission  | SubmitReply (JSON object)    |
//! | `<prefix>/scores/<username>/best`   | none             | ScoreRecord or `null`        |
//!
//! Anything else, including malformed submissions, gets an error reply
//! carrying the reason.

use std::sync::Arc;

use zenoh::bytes::ZBytes;
use zenoh::key_expr::KeyExpr;
use zenoh::query::{Query, Queryable};

use crate::codec::{decode, encode};
use crate::error::{LeaderboardError, Result};
use crate::keyexpr::ScoresKeyexpr;
use crate::local::LocalScoreStore;
use crate::record::{ScoreSubmission, SubmitReply};
use crate::stats::{ServerStats, StatsTracker};

/// Score server answering queries from game clients
#[derive(Debug)]
pub struct ScoreServer {
    /// The zenoh queryable that receives queries
    queryable: Queryable<zenoh::handlers::FifoChannelHandler<Query>>,
    /// Authoritative storage
    store: Arc<LocalScoreStore>,
    stats: StatsTracker,
    prefix: KeyExpr<'static>,
}

impl ScoreServer {
    /// Declare the queryable on `<prefix>/scores/**`
    pub async fn declare(
        session: &zenoh::Session,
        prefix: impl Into<KeyExpr<'static>>,
        store: Arc<LocalScoreStore>,
    ) -> Result<Self> {
        let prefix = prefix.into();
        let keyexpr = ScoresKeyexpr::all(&prefix)?;

        let queryable = session
            .declare_queryable(&keyexpr)
            .await
            .map_err(LeaderboardError::Zenoh)?;

        tracing::info!(
            "Score server declared on {} with {} stored score(s)",
            keyexpr,
            store.len()
        );

        Ok(Self {
            queryable,
            store,
            stats: StatsTracker::new(),
            prefix,
        })
    }

    pub fn prefix(&self) -> &KeyExpr<'static> {
        &self.prefix
    }

    pub fn store(&self) -> &Arc<LocalScoreStore> {
        &self.store
    }

    pub fn stats(&self) -> ServerStats {
        self.stats.get_stats()
    }

    /// Shared handle to the counters, for periodic reporting
    pub fn stats_tracker(&self) -> StatsTracker {
        self.stats.clone()
    }

    /// Serve queries until the queryable is closed
    pub async fn run(&self) -> Result<()> {
        loop {
            self.serve_next().await?;
        }
    }

    /// Wait for one query and answer it
    pub async fn serve_next(&self) -> Result<()> {
        let query = self.queryable.recv_async().await.map_err(|_| {
            LeaderboardError::NoResponse("Queryable channel closed".to_string())
        })?;
        self.handle(query).await;
        Ok(())
    }

    async fn handle(&self, query: Query) {
        let keyexpr = query.key_expr().clone();
        match self.answer(&query) {
            Ok(payload) => {
                if let Err(e) = query.reply(&keyexpr, payload).await {
                    tracing::error!("Failed to reply on {}: {}", keyexpr, e);
                }
            }
            Err(e) => {
                self.stats.add_rejected();
                tracing::debug!("Rejecting query on {}: {}", keyexpr, e);
                if let Err(e) = query.reply_err(zenoh_ext::z_serialize(&e.to_string())).await {
                    tracing::error!("Failed to send error reply on {}: {}", keyexpr, e);
                }
            }
        }
    }

    fn answer(&self, query: &Query) -> Result<ZBytes> {
        let target = ScoresKeyexpr::try_from(query.key_expr().clone())?;
        match (target, query.payload()) {
            (ScoresKeyexpr::Board { .. }, None) => {
                self.stats.add_lookup();
                encode(&self.store.leaderboard())
            }
            (ScoresKeyexpr::Board { .. }, Some(payload)) => {
                let submission: ScoreSubmission = decode(payload)?;
                let saved = self.store.add(submission);
                self.stats.add_accepted();
                tracing::info!(
                    "Accepted score {} of {} ({})",
                    saved.score,
                    saved.username,
                    saved.id
                );
                encode(&SubmitReply {
                    saved,
                    top_scores: self.store.leaderboard(),
                })
            }
            (ScoresKeyexpr::Best { username, .. }, None) => {
                self.stats.add_lookup();
                encode(&self.store.best_for(&username))
            }
            (ScoresKeyexpr::Best { .. }, Some(_)) => Err(LeaderboardError::Rejected(
                "best score lookup takes no payload".to_string(),
            )),
        }
    }
}
