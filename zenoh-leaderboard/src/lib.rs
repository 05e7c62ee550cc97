//! # zenoh-leaderboard
//!
//! Score persistence and ranking for small games, built on top of Zenoh.
//!
//! ## Overview
//!
//! A finished game produces a [`ScoreSubmission`]. Games hand it to a
//! [`ScoreSink`] and never see the transport behind it:
//!
//! - [`RemoteScoreStore`] queries a [`ScoreServer`] over zenoh
//! - [`LocalScoreStore`] keeps records in the current process (optionally in a JSON file)
//! - [`FallbackScoreSink`] combines both: remote first, local cache on failure
//!
//! ## Key Features
//!
//! - Leaderboard order: score descending, most recent first on ties
//! - Top-10 lists and per-player best scores
//! - Malformed submissions are answered with an error reply
//! - No retries: a failed query degrades to the local cache
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zenoh_leaderboard::{LocalScoreStore, ScoreSink, ScoreSubmission, SessionExt, Username};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let session = zenoh::open(zenoh::Config::default()).await?;
//!     let _server = session
//!         .declare_score_server(Arc::new(LocalScoreStore::in_memory()))
//!         .await?;
//!
//!     let store = session.score_store().build();
//!     let reply = store
//!         .submit(ScoreSubmission::new(Username::new("Player")?, 1200, 95_000))
//!         .await?;
//!     println!("Top score: {}", reply.top_scores[0].score);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod board;
mod codec;
pub mod config;
pub mod error;
pub mod keyexpr;
pub mod local;
pub mod record;
pub mod remote;
pub mod server;
pub mod session_ext;
pub mod sink;
pub mod stats;

// Re-exports for convenience
pub use board::Leaderboard;
pub use config::LeaderboardConfig;
pub use error::{LeaderboardError, Result};
pub use local::LocalScoreStore;
pub use record::{
    format_play_time, rank, ScoreId, ScoreRecord, ScoreSubmission, SubmitReply, Username,
    DEFAULT_USERNAME, TOP_SCORES_LIMIT,
};
pub use remote::RemoteScoreStore;
pub use server::ScoreServer;
pub use session_ext::{ScoreServerBuilder, ScoreStoreBuilder, SessionExt};
pub use sink::{FallbackScoreSink, ScoreSink};
pub use stats::{ServerStats, StatsTracker};
