use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Correlation id for one batch upload. Used in logs, the media group caption
/// and the stored metadata; never as a security token or primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for BatchId {
    fn from(value: String) -> Self {
        BatchId(value)
    }
}

/// Create a batch id of the form `batch_{unix_millis}_{9 base36 chars}`.
pub fn create_batch_id() -> BatchId {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    BatchId(format!("batch_{}_{}", Utc::now().timestamp_millis(), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_format() {
        let id = create_batch_id();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "batch");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_consecutive_batch_ids_differ() {
        let first = create_batch_id();
        let second = create_batch_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_batch_ids_unique_across_many_calls() {
        let ids: std::collections::HashSet<BatchId> = (0..1000).map(|_| create_batch_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
