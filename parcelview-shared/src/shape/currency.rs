/// Currency formatting for dashboard display
///
/// Values render as compact magnitudes above a million and as grouped
/// integers below:
///
/// - `>= $1B`: `"$X.XB"` (one decimal)
/// - `>= $1M`: `"$X.XM"` (one decimal)
/// - below: `"$1,234,567"` (comma-grouped)
/// - absent: `"N/A"`
///
/// # Example
///
/// ```
/// use parcelview_shared::shape::currency::format_currency;
///
/// assert_eq!(format_currency(Some(500_000)), "$500,000");
/// assert_eq!(format_currency(Some(2_500_000)), "$2.5M");
/// assert_eq!(format_currency(Some(3_200_000_000)), "$3.2B");
/// assert_eq!(format_currency(None), "N/A");
/// ```

const BILLION: i64 = 1_000_000_000;
const MILLION: i64 = 1_000_000;

/// Formats a dollar amount for display
pub fn format_currency(value: Option<i64>) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };

    if value >= BILLION {
        format!("${:.1}B", value as f64 / BILLION as f64)
    } else if value >= MILLION {
        format!("${:.1}M", value as f64 / MILLION as f64)
    } else {
        format!("${}", group_thousands(value))
    }
}

/// Groups an integer with commas every three digits
fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_value_is_na() {
        assert_eq!(format_currency(None), "N/A");
    }

    #[test]
    fn test_grouped_integers_below_a_million() {
        assert_eq!(format_currency(Some(0)), "$0");
        assert_eq!(format_currency(Some(950)), "$950");
        assert_eq!(format_currency(Some(1_500)), "$1,500");
        assert_eq!(format_currency(Some(500_000)), "$500,000");
        assert_eq!(format_currency(Some(999_999)), "$999,999");
    }

    #[test]
    fn test_millions_have_one_decimal() {
        assert_eq!(format_currency(Some(1_000_000)), "$1.0M");
        assert_eq!(format_currency(Some(2_500_000)), "$2.5M");
        assert_eq!(format_currency(Some(12_340_000)), "$12.3M");
        assert_eq!(format_currency(Some(999_999_999)), "$1000.0M");
    }

    #[test]
    fn test_billions_have_one_decimal() {
        assert_eq!(format_currency(Some(1_000_000_000)), "$1.0B");
        assert_eq!(format_currency(Some(3_200_000_000)), "$3.2B");
    }

    #[test]
    fn test_grouping_helper() {
        assert_eq!(group_thousands(1), "1");
        assert_eq!(group_thousands(12), "12");
        assert_eq!(group_thousands(123), "123");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(12_345), "12,345");
        assert_eq!(group_thousands(123_456), "123,456");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
