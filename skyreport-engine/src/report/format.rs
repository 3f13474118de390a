//! Field formatting rules shared by every renderer
//!
//! Renderers never format money, percentages or derived metrics on their
//! own. Text renderers call the string functions here; the spreadsheet
//! renderer writes raw numbers with the matching number-format codes so
//! the displayed value is identical.

use super::model::Filter;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Spreadsheet number format equivalent to [`format_currency`]
pub const CURRENCY_NUM_FORMAT: &str = "$#,##0.00";

/// Spreadsheet number format for grouped integers, equivalent to [`format_count`]
pub const COUNT_NUM_FORMAT: &str = "#,##0";

/// Spreadsheet number format for a 0-1 ratio shown with `decimals` places,
/// equivalent to [`format_ratio_percent`]
pub fn percent_num_format(decimals: usize) -> String {
    if decimals == 0 {
        "0%".to_string()
    } else {
        format!("0.{}%", "0".repeat(decimals))
    }
}

/// Format an integer with comma thousands separators
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Counts are grouped: 4500 -> "4,500"
pub fn format_count(n: u64) -> String {
    group_thousands(n)
}

/// Money: "$" + grouped whole part + two decimals. Negative amounts
/// carry a leading minus: -12.5 -> "-$12.50".
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i128;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100) as u64;
    let fraction = cents % 100;
    format!("{}${}.{:02}", sign, group_thousands(whole), fraction)
}

/// A value in 0-1 scale shown as a percentage: 0.082 -> "8.2%"
pub fn format_ratio_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// A value already in 0-100 scale: 8.2 -> "8.2%". Never rescaled.
pub fn format_scaled_percent(value: f64) -> String {
    format!("{}%", value)
}

/// Average rating on the 0-5 scale: 4.2 -> "4.2/5.0"
pub fn format_rating(rating: f64) -> String {
    format!("{}/5.0", rating)
}

/// Occupancy in 0-100 scale with one decimal: 78.25 -> "78.3%"
pub fn format_occupancy(percent: f64) -> String {
    format!("{:.1}%", percent)
}

pub fn format_timestamp(at: &DateTime<Utc>, date_format: &str) -> String {
    at.format(date_format).to_string()
}

pub fn destination_label(filter: &Filter) -> String {
    match filter {
        Filter::All => "All Destinations".to_string(),
        Filter::Only(value) => value.clone(),
    }
}

pub fn status_label(filter: &Filter) -> String {
    match filter {
        Filter::All => "All Statuses".to_string(),
        Filter::Only(value) => value.clone(),
    }
}

/// Estimated route revenue: bookings at the average ticket price, or at
/// `fallback_price` when the snapshot has no average
pub fn route_revenue(bookings: u64, avg_ticket_price: Option<f64>, fallback_price: f64) -> f64 {
    bookings as f64 * avg_ticket_price.unwrap_or(fallback_price)
}

/// `floor(total * fraction)` as a count
pub fn floor_share(total: f64, fraction: f64) -> u64 {
    let value = (total * fraction).floor();
    if value <= 0.0 {
        0
    } else {
        value as u64
    }
}

/// Occupancy estimate in [min, max] percent, rounded to one decimal.
///
/// Drawn fresh for every rendered row, so two renders of the same model
/// disagree unless the RNG is seeded identically.
pub fn occupancy_rate<R: Rng + ?Sized>(rng: &mut R, min_percent: f64, max_percent: f64) -> f64 {
    let raw = min_percent + rng.gen::<f64>() * (max_percent - min_percent);
    ((raw * 10.0).round() / 10.0).clamp(min_percent, max_percent)
}

/// Double every quote so the value can sit inside a quoted field
pub fn escape_quoted(s: &str) -> String {
    s.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(4500), "4,500");
        assert_eq!(group_thousands(1250000), "1,250,000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_250_000.0), "$1,250,000.00");
        assert_eq!(format_currency(278.0), "$278.00");
        assert_eq!(format_currency(33360.0), "$33,360.00");
        assert_eq!(format_currency(12345.678), "$12,345.68");
        assert_eq!(format_currency(0.004), "$0.00");
        assert_eq!(format_currency(-12.5), "-$12.50");
    }

    #[test]
    fn test_percent_scales_are_distinct() {
        assert_eq!(format_ratio_percent(0.082, 1), "8.2%");
        assert_eq!(format_ratio_percent(0.87, 0), "87%");
        assert_eq!(format_scaled_percent(8.2), "8.2%");
        assert_eq!(format_scaled_percent(12.5), "12.5%");
        assert_eq!(format_scaled_percent(10.0), "10%");
    }

    #[test]
    fn test_num_formats() {
        assert_eq!(percent_num_format(0), "0%");
        assert_eq!(percent_num_format(1), "0.0%");
        assert_eq!(percent_num_format(2), "0.00%");
    }

    #[test]
    fn test_labels() {
        assert_eq!(destination_label(&Filter::All), "All Destinations");
        assert_eq!(status_label(&Filter::All), "All Statuses");
        assert_eq!(destination_label(&Filter::Only("Rome".to_string())), "Rome");
        assert_eq!(format_rating(4.2), "4.2/5.0");
    }

    #[test]
    fn test_route_revenue() {
        assert_eq!(route_revenue(120, Some(278.0), 250.0), 33360.0);
        assert_eq!(route_revenue(120, None, 250.0), 30000.0);
    }

    #[test]
    fn test_floor_share() {
        assert_eq!(floor_share(4500.0, 0.082), 369);
        assert_eq!(floor_share(1_250_000.0, 0.06), 75000);
        assert_eq!(floor_share(1575.0, 0.45), 708);
        assert_eq!(floor_share(0.0, 0.5), 0);
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("Great service \"A+\""), "Great service \"\"A+\"\"");
        assert_eq!(escape_quoted("plain"), "plain");
    }

    #[test]
    fn test_occupancy_rate_range_and_seeding() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let rate = occupancy_rate(&mut rng, 65.0, 95.0);
            assert!((65.0..=95.0).contains(&rate));
            assert_eq!(((rate * 10.0).round() / 10.0), rate);
        }

        let a = occupancy_rate(&mut StdRng::seed_from_u64(1), 65.0, 95.0);
        let b = occupancy_rate(&mut StdRng::seed_from_u64(1), 65.0, 95.0);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_currency_reads_back_to_cents(cents in 0u64..10_000_000_000u64) {
            let amount = cents as f64 / 100.0;
            let shown = format_currency(amount);
            prop_assert!(shown.starts_with('$'));
            let digits: String = shown.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(digits.parse::<u64>().unwrap(), cents);
        }

        #[test]
        fn prop_grouping_has_no_leading_separator(n in any::<u64>()) {
            let grouped = group_thousands(n);
            prop_assert!(!grouped.starts_with(','));
            prop_assert_eq!(grouped.replace(',', ""), n.to_string());
        }

        #[test]
        fn prop_scaled_percent_never_rescales(value in 0.0f64..100.0) {
            let shown = format_scaled_percent(value);
            let parsed: f64 = shown.trim_end_matches('%').parse().unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
