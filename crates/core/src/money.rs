//! Peso amounts as shown to customers.

/// Formats a whole-peso amount the way es-AR renders ARS with no decimals.
///
/// `8_450_000` becomes `"$ 8.450.000"`.
#[must_use]
pub fn format_ars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    grouped.push_str("$ ");
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_ars(8_450_000), "$ 8.450.000");
        assert_eq!(format_ars(21_300_000), "$ 21.300.000");
        assert_eq!(format_ars(100_000), "$ 100.000");
    }

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(format_ars(0), "$ 0");
        assert_eq!(format_ars(999), "$ 999");
        assert_eq!(format_ars(1_000), "$ 1.000");
    }
}
