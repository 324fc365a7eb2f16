/// Rounds an amount to currency precision (2 decimal places).
///
/// Pricing keeps full precision between discount stages; call this only at
/// a presentation boundary.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Formats an amount for display, always with two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("{:.2}", round_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(round_currency(76.499999999999), 76.5);
        assert_eq!(round_currency(0.1 + 0.2), 0.3);
        assert_eq!(round_currency(0.0), 0.0);
    }

    #[test]
    fn test_format_two_decimals() {
        assert_eq!(format_currency(76.5), "76.50");
        assert_eq!(format_currency(100.0), "100.00");
    }
}
