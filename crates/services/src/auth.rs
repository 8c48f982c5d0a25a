/// PIN used when no other is configured.
pub const DEFAULT_ADMIN_PIN: &str = "2626";

/// Decides whether a presented credential unlocks administration.
///
/// Kept as a seam so the static PIN can be swapped for a real credential or
/// session check without touching the services behind it.
pub trait AuthorizationCheck: Send + Sync {
    fn verify(&self, credential: &str) -> bool;
}

/// A single shared PIN compared in constant time.
#[derive(Clone)]
pub struct StaticPin {
    pin: String,
}

impl StaticPin {
    #[must_use]
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }
}

impl Default for StaticPin {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_PIN)
    }
}

impl std::fmt::Debug for StaticPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPin(..)")
    }
}

impl AuthorizationCheck for StaticPin {
    fn verify(&self, credential: &str) -> bool {
        let expected = self.pin.as_bytes();
        let given = credential.trim().as_bytes();
        if expected.is_empty() || expected.len() != given.len() {
            return false;
        }
        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pin_unlocks() {
        let check = StaticPin::default();
        assert!(check.verify("2626"));
        assert!(check.verify(" 2626 "));
    }

    #[test]
    fn wrong_or_partial_pin_is_rejected() {
        let check = StaticPin::new("4321");
        assert!(!check.verify("4320"));
        assert!(!check.verify("432"));
        assert!(!check.verify("43210"));
        assert!(!check.verify(""));
    }

    #[test]
    fn empty_configured_pin_never_unlocks() {
        assert!(!StaticPin::new("").verify(""));
    }

    #[test]
    fn debug_hides_pin() {
        assert_eq!(format!("{:?}", StaticPin::new("9999")), "StaticPin(..)");
    }
}
