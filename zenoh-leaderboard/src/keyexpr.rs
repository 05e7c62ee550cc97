//! Key expression types for score operations
//!
//! The score server answers three operations, each mapped on a key expression:
//!
//! - `<prefix>/scores` without payload: top list
//! - `<prefix>/scores` with a JSON payload: submit a score
//! - `<prefix>/scores/<username>/best`: best record of one player

use crate::error::LeaderboardError;
use crate::record::Username;
use zenoh::key_expr::KeyExpr;

/// Score keyexpr - addresses the leaderboard or one player's best record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoresKeyexpr {
    /// Pattern: `<prefix>/scores`
    Board { prefix: String },
    /// Pattern: `<prefix>/scores/<username>/best`
    Best { prefix: String, username: Username },
}

impl ScoresKeyexpr {
    pub fn board(prefix: &KeyExpr) -> Self {
        ScoresKeyexpr::Board {
            prefix: prefix.to_string(),
        }
    }

    pub fn best(prefix: &KeyExpr, username: Username) -> Self {
        ScoresKeyexpr::Best {
            prefix: prefix.to_string(),
            username,
        }
    }

    /// Pattern matching every score operation under a prefix: `<prefix>/scores/**`
    pub fn all(prefix: &KeyExpr) -> Result<KeyExpr<'static>, LeaderboardError> {
        prefix
            .join("scores/**")
            .map_err(|e| LeaderboardError::InvalidKeyexpr(e.to_string()))
    }

    pub fn prefix(&self) -> &str {
        match self {
            ScoresKeyexpr::Board { prefix } | ScoresKeyexpr::Best { prefix, .. } => prefix,
        }
    }
}

impl TryFrom<KeyExpr<'_>> for ScoresKeyexpr {
    type Error = LeaderboardError;

    fn try_from(keyexpr: KeyExpr<'_>) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = keyexpr.as_str().split('/').collect();
        let invalid = || {
            LeaderboardError::InvalidKeyexpr(format!(
                "Invalid ScoresKeyexpr pattern: {}",
                keyexpr.as_str()
            ))
        };

        // [...prefix]/scores
        if parts.len() >= 2 && parts[parts.len() - 1] == "scores" {
            let prefix = parts[..parts.len() - 1].join("/");
            return Ok(ScoresKeyexpr::Board { prefix });
        }

        // [...prefix]/scores/<username>/best
        if parts.len() >= 4
            && parts[parts.len() - 1] == "best"
            && parts[parts.len() - 3] == "scores"
        {
            let name = parts[parts.len() - 2];
            if name.contains('*') {
                return Err(invalid());
            }
            let username = Username::new(name).map_err(|_| invalid())?;
            let prefix = parts[..parts.len() - 3].join("/");
            return Ok(ScoresKeyexpr::Best { prefix, username });
        }

        Err(invalid())
    }
}

impl TryFrom<ScoresKeyexpr> for KeyExpr<'static> {
    type Error = LeaderboardError;

    fn try_from(scores_keyexpr: ScoresKeyexpr) -> Result<Self, Self::Error> {
        let keyexpr_str = match &scores_keyexpr {
            ScoresKeyexpr::Board { prefix } => format!("{}/scores", prefix),
            ScoresKeyexpr::Best { prefix, username } => {
                format!("{}/scores/{}/best", prefix, username)
            }
        };
        KeyExpr::try_from(keyexpr_str)
            .map(|k| k.into_owned())
            .map_err(|e| LeaderboardError::InvalidKeyexpr(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix() -> KeyExpr<'static> {
        KeyExpr::try_from("arcade/tetris").unwrap()
    }

    #[test]
    fn test_board_keyexpr() {
        let keyexpr: KeyExpr = ScoresKeyexpr::board(&prefix()).try_into().unwrap();
        assert_eq!(keyexpr.as_str(), "arcade/tetris/scores");

        let parsed = ScoresKeyexpr::try_from(keyexpr).unwrap();
        assert_eq!(parsed, ScoresKeyexpr::board(&prefix()));
        assert_eq!(parsed.prefix(), "arcade/tetris");
    }

    #[test]
    fn test_best_keyexpr() {
        let ann = Username::new("ann").unwrap();
        let keyexpr: KeyExpr = ScoresKeyexpr::best(&prefix(), ann.clone()).try_into().unwrap();
        assert_eq!(keyexpr.as_str(), "arcade/tetris/scores/ann/best");

        match ScoresKeyexpr::try_from(keyexpr).unwrap() {
            ScoresKeyexpr::Best { prefix, username } => {
                assert_eq!(prefix, "arcade/tetris");
                assert_eq!(username, ann);
            }
            other => panic!("Expected Best keyexpr, got {:?}", other),
        }
    }

    #[test]
    fn test_all_pattern() {
        let all = ScoresKeyexpr::all(&prefix()).unwrap();
        assert_eq!(all.as_str(), "arcade/tetris/scores/**");
    }

    #[test]
    fn test_invalid_patterns() {
        for s in [
            "arcade/tetris/scores/ann",
            "arcade/tetris/scores/*/best",
            "arcade/tetris/other",
            "scores",
        ] {
            let keyexpr = KeyExpr::try_from(s).unwrap();
            assert!(ScoresKeyexpr::try_from(keyexpr).is_err(), "{} should not parse", s);
        }
    }
}
