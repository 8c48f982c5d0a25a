use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::customer::CustomerError;

/// Account number identifying a customer.
///
/// Opaque to the domain: any trimmed, non-empty string is accepted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a new `CustomerId` from raw input.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::EmptyId` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CustomerError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CustomerError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = CustomerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

/// Storage identifier for a configured reward tier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TierId(u64);

impl TierId {
    /// Creates a new `TierId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomerId({})", self.0)
    }
}

impl fmt::Debug for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TierId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for TierId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TierId::new)
            .map_err(|_| ParseIdError { kind: "TierId" })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_is_trimmed() {
        let id = CustomerId::new("  1002 ").unwrap();
        assert_eq!(id.as_str(), "1002");
        assert_eq!(id.to_string(), "1002");
    }

    #[test]
    fn customer_id_rejects_blank() {
        assert_eq!(CustomerId::new("   ").unwrap_err(), CustomerError::EmptyId);
    }

    #[test]
    fn customer_id_deserialize_validates() {
        let id: CustomerId = serde_json::from_str("\"1001\"").unwrap();
        assert_eq!(id.as_str(), "1001");
        assert!(serde_json::from_str::<CustomerId>("\"  \"").is_err());
    }

    #[test]
    fn tier_id_from_str() {
        let id: TierId = "7".parse().unwrap();
        assert_eq!(id, TierId::new(7));
        assert!("seven".parse::<TierId>().is_err());
    }
}
