//! Display formatting helpers

/// Shown when a result carries no view statistics
pub const VIEW_COUNT_UNAVAILABLE: &str = "N/A";

/// Group digits with commas, e.g. 1234567 -> "1,234,567"
pub fn format_view_count(count: i64) -> String {
    let digits = count.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if count < 0 {
        out.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_view_count() {
        assert_eq!(format_view_count(0), "0");
        assert_eq!(format_view_count(999), "999");
        assert_eq!(format_view_count(1000), "1,000");
        assert_eq!(format_view_count(1234567), "1,234,567");
        assert_eq!(format_view_count(100000), "100,000");
        assert_eq!(format_view_count(-1500), "-1,500");
    }
}
