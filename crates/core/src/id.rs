use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

const ID_LEN: usize = 24;

/// Opaque document id, 24 lowercase hex characters.
///
/// Layout matches a MongoDB ObjectId: a 4-byte big-endian seconds timestamp
/// followed by 8 random bytes, so ids sort roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Allocate a fresh id stamped with `now`
    pub fn generate(now: DateTime<Utc>) -> Self {
        let seconds = u32::try_from(now.timestamp().max(0)).unwrap_or(u32::MAX);
        let random = uuid::Uuid::new_v4();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);

        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Parse a client-supplied id, rejecting anything but 24 hex characters
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if is_object_id(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(DomainError::MalformedIdentity(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PatientId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether `raw` has the shape of a document id
pub fn is_object_id(raw: &str) -> bool {
    raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let now = Utc::now();
        let a = PatientId::generate(now);
        let b = PatientId::generate(now);
        assert!(is_object_id(a.as_str()));
        assert_ne!(a, b);
        // Same second, same timestamp prefix
        assert_eq!(&a.as_str()[..8], &b.as_str()[..8]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PatientId::parse("68cdcba34ddc05b1f94c8350").is_ok());
        assert!(matches!(
            PatientId::parse("not-an-id"),
            Err(DomainError::MalformedIdentity(_))
        ));
        assert!(PatientId::parse("68cdcba34ddc05b1f94c835z").is_err());
        assert!(PatientId::parse("68cdcba34ddc05b1f94c83500").is_err());
    }
}
