use std::sync::Arc;

use zenoh::{key_expr::KeyExpr, Resolvable};

use crate::config::LeaderboardConfig;
use crate::error::Result;
use crate::local::LocalScoreStore;
use crate::remote::RemoteScoreStore;
use crate::server::ScoreServer;

/// Extension trait for zenoh::Session to declare score servers and clients
pub trait SessionExt {
    /// Declare a score server backed by `store`
    ///
    /// # Example
    /// ```no_run
    /// use std::sync::Arc;
    /// use zenoh_leaderboard::{LocalScoreStore, SessionExt};
    ///
    /// # async fn example() {
    /// let session = zenoh::open(zenoh::Config::default()).await.unwrap();
    /// let server = session
    ///     .declare_score_server(Arc::new(LocalScoreStore::in_memory()))
    ///     .await
    ///     .unwrap();
    /// # }
    /// ```
    fn declare_score_server(&self, store: Arc<LocalScoreStore>) -> ScoreServerBuilder<'_>;

    /// Create a client of the score server
    fn score_store(&self) -> ScoreStoreBuilder<'_>;
}

impl SessionExt for zenoh::Session {
    fn declare_score_server(&self, store: Arc<LocalScoreStore>) -> ScoreServerBuilder<'_> {
        ScoreServerBuilder::new(self, store)
    }

    fn score_store(&self) -> ScoreStoreBuilder<'_> {
        ScoreStoreBuilder {
            session: self,
            config: LeaderboardConfig::default(),
        }
    }
}

/// Builder for score servers
#[must_use = "Resolvables do nothing unless you resolve them using `.await`"]
pub struct ScoreServerBuilder<'a> {
    session: &'a zenoh::Session,
    store: Arc<LocalScoreStore>,
    prefix: KeyExpr<'static>,
}

impl<'a> ScoreServerBuilder<'a> {
    fn new(session: &'a zenoh::Session, store: Arc<LocalScoreStore>) -> Self {
        Self {
            session,
            store,
            prefix: LeaderboardConfig::default().keyexpr_prefix,
        }
    }

    /// Set the key expression prefix
    pub fn prefix(mut self, prefix: KeyExpr<'static>) -> Self {
        self.prefix = prefix;
        self
    }
}

impl Resolvable for ScoreServerBuilder<'_> {
    type To = Result<ScoreServer>;
}

impl<'a> std::future::IntoFuture for ScoreServerBuilder<'a> {
    type Output = <Self as Resolvable>::To;
    type IntoFuture =
        std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { ScoreServer::declare(self.session, self.prefix, self.store).await })
    }
}

/// Builder for score server clients
pub struct ScoreStoreBuilder<'a> {
    session: &'a zenoh::Session,
    config: LeaderboardConfig,
}

impl ScoreStoreBuilder<'_> {
    /// Set the key expression prefix
    pub fn prefix(mut self, prefix: KeyExpr<'static>) -> Self {
        self.config.keyexpr_prefix = prefix;
        self
    }

    /// Set the query timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.query_timeout_ms = timeout_ms;
        self
    }

    pub fn build(self) -> RemoteScoreStore {
        RemoteScoreStore::new(self.session.clone(), self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaderboardError;
    use crate::keyexpr::ScoresKeyexpr;
    use crate::record::{ScoreSubmission, Username};
    use crate::sink::ScoreSink;

    fn unique_prefix() -> KeyExpr<'static> {
        KeyExpr::try_from(format!("test/{}", crate::record::ScoreId::generate()))
            .unwrap()
            .into_owned()
    }

    async fn start_server(
        session: &zenoh::Session,
        prefix: KeyExpr<'static>,
    ) -> (Arc<ScoreServer>, tokio::task::JoinHandle<()>) {
        let server = Arc::new(
            session
                .declare_score_server(Arc::new(LocalScoreStore::in_memory()))
                .prefix(prefix)
                .await
                .unwrap(),
        );
        let runner = server.clone();
        let handle = tokio::spawn(async move {
            let _ = runner.run().await;
        });
        (server, handle)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_submit_and_lookup_roundtrip() {
        let session = zenoh::open(zenoh::Config::default()).await.unwrap();
        let prefix = unique_prefix();
        let (server, handle) = start_server(&session, prefix.clone()).await;
        let client = session.score_store().prefix(prefix).build();

        let ann = Username::new("ann").unwrap();
        let reply = client
            .submit(ScoreSubmission::new(ann.clone(), 1500, 120_000))
            .await
            .unwrap();
        assert_eq!(reply.saved.score, 1500);
        assert_eq!(reply.top_scores.len(), 1);

        client
            .submit(ScoreSubmission::new(Username::new("bob").unwrap(), 2500, 1000))
            .await
            .unwrap();

        let top = client.top_scores().await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username.as_str(), "bob");

        let best = client.best_for(&ann).await.unwrap().unwrap();
        assert_eq!(best.score, 1500);
        let nobody = client.best_for(&Username::new("zed").unwrap()).await.unwrap();
        assert!(nobody.is_none());

        let stats = server.stats();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.lookups, 3);
        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_malformed_submission_rejected() {
        let session = zenoh::open(zenoh::Config::default()).await.unwrap();
        let prefix = unique_prefix();
        let (server, handle) = start_server(&session, prefix.clone()).await;

        let keyexpr: KeyExpr = ScoresKeyexpr::board(&prefix).try_into().unwrap();
        let replies = session
            .get(keyexpr)
            .payload(zenoh_ext::z_serialize(&r#"{"username":"","score":1}"#.to_string()))
            .await
            .unwrap();
        let reply = replies.recv_async().await.unwrap();
        assert!(reply.result().is_err());

        assert_eq!(server.stats().rejected, 1);
        assert!(server.store().is_empty());
        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_no_server_is_no_response() {
        let session = zenoh::open(zenoh::Config::default()).await.unwrap();
        let client = session
            .score_store()
            .prefix(unique_prefix())
            .timeout_ms(200)
            .build();

        let result = client.top_scores().await;
        assert!(matches!(result, Err(LeaderboardError::NoResponse(_))));
    }
}
