use chrono::DateTime;

pub fn format_amount(amount: f64, asset: &str) -> String {
    let decimals = if amount.abs() >= 1_000.0 { 2 } else { 6 };
    let s = format!("{amount:.decimals$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    format!("{s} {asset}")
}

pub fn format_usd(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = (cents / 100).abs();
    let mut digits = whole.to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = format!(",{tail}{grouped}");
    }
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}${digits}{grouped}.{:02}", (cents % 100).abs())
}

pub fn format_change(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{pct:.2}%")
    } else {
        format!("{pct:.2}%")
    }
}

/// CSS class for a price change.
pub fn change_class(pct: f64) -> &'static str {
    if pct >= 0.0 {
        "text-success"
    } else {
        "text-error"
    }
}

/// RFC 3339 timestamp as `YYYY-MM-DD HH:MM`; unparseable input is shown
/// verbatim.
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| ts.to_string()),
        None => "—".to_string(),
    }
}

pub fn status_badge(status: &str) -> &'static str {
    match status {
        "completed" | "active" | "success" => "badge badge-success",
        "pending" | "processing" => "badge badge-warning",
        "failed" | "cancelled" | "rejected" => "badge badge-error",
        _ => "badge badge-ghost",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_drop_trailing_zeros() {
        assert_eq!(format_amount(0.5, "BTC"), "0.5 BTC");
        assert_eq!(format_amount(2.0, "ETH"), "2 ETH");
        assert_eq!(format_amount(1234.5678, "USDT"), "1234.57 USDT");
    }

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-12.5), "-$12.50");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn change_is_signed() {
        assert_eq!(format_change(1.234), "+1.23%");
        assert_eq!(format_change(-0.5), "-0.50%");
        assert_eq!(change_class(-0.5), "text-error");
    }

    #[test]
    fn timestamps_fall_back_to_raw_text() {
        assert_eq!(format_timestamp(Some("2024-03-01T10:05:00Z")), "2024-03-01 10:05");
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(None), "—");
    }
}
