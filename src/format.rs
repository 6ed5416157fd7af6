//! Number formatting for log lines and summaries.

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    // one decimal, so .95 and up carries into the integer part
    let tenths = (n * 10.0).round() as u64;
    let int_part = tenths / 10;
    let tenth = tenths % 10;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if tenth > 0 {
        format!("{}.{}", result, tenth)
    } else {
        result
    }
}

/// Format a duration in seconds as "1h 02m 03s" style text.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_basic() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
    }

    #[test]
    fn format_number_with_fraction() {
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-1_500.25), "-1,500.3");
    }

    #[test]
    fn format_number_carries_rounded_tenth() {
        assert_eq!(format_number(4.97), "5");
        assert_eq!(format_number(999.96), "1,000");
        assert_eq!(format_number(1_999.99), "2,000");
        assert_eq!(format_number(0.04), "0");
        assert_eq!(format_number(0.05), "0.1");
    }

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(59.9), "59s");
        assert_eq!(format_duration(61.0), "1m 01s");
        assert_eq!(format_duration(3_723.0), "1h 02m 03s");
        assert_eq!(format_duration(-5.0), "0s");
    }
}
