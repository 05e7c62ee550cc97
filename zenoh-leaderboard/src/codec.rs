//! Payload encoding: JSON text carried as a zenoh-ext serialized string

use serde::{de::DeserializeOwned, Serialize};
use zenoh::bytes::ZBytes;

use crate::error::{LeaderboardError, Result};

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<ZBytes> {
    let json = serde_json::to_string(value)?;
    Ok(zenoh_ext::z_serialize(&json))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &ZBytes) -> Result<T> {
    let json = decode_text(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

pub(crate) fn decode_text(bytes: &ZBytes) -> Result<String> {
    zenoh_ext::z_deserialize::<String>(bytes)
        .map_err(|e| LeaderboardError::Serialization(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ScoreSubmission, Username};

    #[test]
    fn test_submission_payload() {
        let submission = ScoreSubmission::new(Username::new("ann").unwrap(), 1200, 65_000);
        let bytes = encode(&submission).unwrap();
        let decoded: ScoreSubmission = decode(&bytes).unwrap();
        assert_eq!(decoded, submission);
    }

    #[test]
    fn test_malformed_json() {
        let bytes = zenoh_ext::z_serialize(&"{not json".to_string());
        let result: Result<ScoreSubmission> = decode(&bytes);
        assert!(matches!(result, Err(LeaderboardError::Json(_))));
    }

    #[test]
    fn test_raw_bytes_are_not_text() {
        let bytes = ZBytes::from(vec![0xffu8]);
        assert!(matches!(
            decode_text(&bytes),
            Err(LeaderboardError::Serialization(_))
        ));
    }
}
