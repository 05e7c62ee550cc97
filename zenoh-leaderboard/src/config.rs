//! Configuration for score stores and servers

use zenoh::key_expr::KeyExpr;

use crate::record::TOP_SCORES_LIMIT;

/// Main configuration shared by the score server and its clients
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Key expression prefix for all score operations
    pub keyexpr_prefix: KeyExpr<'static>,

    /// Timeout for a single query to the score server (in milliseconds)
    /// No reply within this time is treated as a network failure.
    pub query_timeout_ms: u64,

    /// Maximum number of records in a top list
    pub top_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            keyexpr_prefix: KeyExpr::try_from("z_tetris").unwrap().into_owned(),
            query_timeout_ms: 2000,
            top_limit: TOP_SCORES_LIMIT,
        }
    }
}

impl LeaderboardConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key expression prefix
    pub fn with_prefix(mut self, prefix: KeyExpr<'static>) -> Self {
        self.keyexpr_prefix = prefix;
        self
    }

    /// Set the query timeout in milliseconds
    pub fn with_query_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.query_timeout_ms = timeout_ms;
        self
    }

    /// Set the top list size (at least one record)
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LeaderboardConfig::default();
        assert_eq!(config.keyexpr_prefix.as_str(), "z_tetris");
        assert_eq!(config.query_timeout_ms, 2000);
        assert_eq!(config.top_limit, 10);
    }

    #[test]
    fn test_builder() {
        let config = LeaderboardConfig::new()
            .with_prefix(KeyExpr::try_from("arcade/room1").unwrap().into_owned())
            .with_query_timeout_ms(250)
            .with_top_limit(0);
        assert_eq!(config.keyexpr_prefix.as_str(), "arcade/room1");
        assert_eq!(config.query_timeout_ms, 250);
        assert_eq!(config.top_limit, 1);
    }
}
