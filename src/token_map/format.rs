//! Display formatting and free-text token input parsing

const THOUSAND: u64 = 1_000;
const MILLION: u64 = 1_000_000;
const BILLION: u64 = 1_000_000_000;

/// Magnitude-suffixed token count: `999`, `1.5K`, `2.3M`, `4.1B`.
///
/// The one decimal is rounded half up, so `1_250` reads `1.3K`.
pub fn format_tokens(n: u64) -> String {
    if n >= BILLION {
        format!("{}B", tenths(n, BILLION))
    } else if n >= MILLION {
        format!("{}M", tenths(n, MILLION))
    } else if n >= THOUSAND {
        format!("{}K", tenths(n, THOUSAND))
    } else {
        n.to_string()
    }
}

/// `n / unit` to one decimal, ties rounded up, computed on integers
fn tenths(n: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let scaled = (u128::from(n) * 10 + unit / 2) / unit;
    format!("{}.{}", scaled / 10, scaled % 10)
}

/// Percentage with one decimal place, e.g. `23.7%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Parse an edited token count such as `2.5m`, `800K` or `1200`.
///
/// Every character other than digits and `.` is dropped before the number is
/// read. The multiplier comes from the first of `b`, `m`, `k` present in the
/// input (case-insensitive). Returns `None` when no number can be read.
pub fn parse_token_input(input: &str) -> Option<u64> {
    let lower = input.to_ascii_lowercase();
    let multiplier = if lower.contains('b') {
        BILLION
    } else if lower.contains('m') {
        MILLION
    } else if lower.contains('k') {
        THOUSAND
    } else {
        1
    };

    let cleaned: String = lower
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let value = leading_number(&cleaned)? * multiplier as f64;
    if !value.is_finite() || value > u64::MAX as f64 {
        return None;
    }
    Some(value.round() as u64)
}

/// Longest prefix of the form `digits[.digits]` read as a float
fn leading_number(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens_thresholds() {
        assert_eq!(format_tokens(0), "0");
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_000), "1.0K");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_300_000), "2.3M");
        assert_eq!(format_tokens(4_100_000_000), "4.1B");
        assert_eq!(format_tokens(24_310_000_000), "24.3B");
    }

    #[test]
    fn test_format_tokens_rounds_ties_up() {
        assert_eq!(format_tokens(1_250), "1.3K");
        assert_eq!(format_tokens(7_250_000), "7.3M");
        assert_eq!(format_tokens(1_250_000_000), "1.3B");
        assert_eq!(format_tokens(1_249), "1.2K");
        assert_eq!(format_tokens(u64::MAX), "18446744073.7B");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(23.653), "23.7%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_token_input("2.5m"), Some(2_500_000));
        assert_eq!(parse_token_input("800K"), Some(800_000));
        assert_eq!(parse_token_input("1.2B"), Some(1_200_000_000));
        assert_eq!(parse_token_input("1200"), Some(1_200));
    }

    #[test]
    fn test_parse_ignores_noise() {
        assert_eq!(parse_token_input(" 3,000 "), Some(3_000));
        assert_eq!(parse_token_input("~4.5 m tokens"), Some(4_500_000));
        assert_eq!(parse_token_input(".5k"), Some(500));
        assert_eq!(parse_token_input("1.2.3"), Some(1));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_token_input(""), None);
        assert_eq!(parse_token_input("abc"), None);
        assert_eq!(parse_token_input("."), None);
        assert_eq!(parse_token_input("k"), None);
    }
}
