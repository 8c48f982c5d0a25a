use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Argentina is UTC-3 all year.
const ART_OFFSET_SECS: i32 = 3 * 3600;

/// Long month label in es-AR local time, e.g. `"octubre de 2026"`.
#[must_use]
pub fn month_label_es_ar(at: DateTime<Utc>) -> String {
    let local = match FixedOffset::west_opt(ART_OFFSET_SECS) {
        Some(offset) => at.with_timezone(&offset).date_naive(),
        None => at.date_naive(),
    };
    let month = MONTHS_ES[local.month0() as usize];
    format!("{month} de {}", local.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_does_not_move_with_wall_time() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.now(), fixed_clock().now());
    }

    #[test]
    fn month_label_is_spanish() {
        // 2023-11-14
        assert_eq!(month_label_es_ar(fixed_now()), "noviembre de 2023");
        // 2024-01-15T12:00:00Z
        let january = DateTime::<Utc>::from_timestamp(1_705_320_000, 0).unwrap();
        assert_eq!(month_label_es_ar(january), "enero de 2024");
    }

    #[test]
    fn month_label_uses_buenos_aires_time() {
        // 2023-12-01T01:00:00Z is still November 30th, 22:00 in Buenos Aires.
        let late_november = DateTime::<Utc>::from_timestamp(1_701_392_400, 0).unwrap();
        assert_eq!(month_label_es_ar(late_november), "noviembre de 2023");
        // 2024-01-01T02:59:59Z is New Year's Eve locally.
        let new_years_eve = DateTime::<Utc>::from_timestamp(1_704_077_999, 0).unwrap();
        assert_eq!(month_label_es_ar(new_years_eve), "diciembre de 2023");
        // 2024-01-01T03:00:00Z is local midnight.
        let new_year = DateTime::<Utc>::from_timestamp(1_704_078_000, 0).unwrap();
        assert_eq!(month_label_es_ar(new_year), "enero de 2024");
    }
}
