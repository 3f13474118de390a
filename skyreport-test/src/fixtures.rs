//! Common test data
//!
//! The fixed snapshot mirrors the sample provider's totals with a short,
//! deterministic daily series so expected values can be computed by hand.

use chrono::{TimeZone, Utc};
use skyreport_core::{
    ClassBookings, Clock, CustomerRecord, DailyRevenue, FixedClock, MetricsSnapshot,
    QuarterMargin, RouteBookings,
};
use std::sync::Arc;

/// 2024-03-09T12:00:00Z as (year, month, day, hour, minute, second)
pub const FIXED_TIMESTAMP: (i32, u32, u32, u32, u32, u32) = (2024, 3, 9, 12, 0, 0);

pub fn fixed_clock() -> Arc<dyn Clock> {
    let (y, m, d, h, min, s) = FIXED_TIMESTAMP;
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .expect("fixed timestamp is valid"),
    ))
}

pub fn sample_customers() -> Vec<CustomerRecord> {
    vec![
        CustomerRecord {
            id: "1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "a@b.com".to_string(),
            phone: "+1 555-100".to_string(),
            bookings_count: 3,
        },
        CustomerRecord {
            id: "2".to_string(),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            email: "john.smith@example.com".to_string(),
            phone: "+1 555-101".to_string(),
            bookings_count: 1,
        },
    ]
}

/// Three days of revenue, two routes and a quoted feedback comment
pub fn fixed_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        total_revenue: 1_250_000.0,
        revenue_change: Some(12.5),
        total_bookings: 4500,
        bookings_change: Some(8.2),
        avg_ticket_price: Some(278.0),
        avg_price_change: Some(3.5),
        revenue_data: vec![
            DailyRevenue { date: "Day 1".to_string(), amount: 12000.0, costs: 5500.0 },
            DailyRevenue { date: "Day 2".to_string(), amount: 13900.0, costs: 6000.0 },
            DailyRevenue { date: "Day 3".to_string(), amount: 11120.5, costs: 6250.25 },
        ],
        bookings_by_class: vec![
            ClassBookings { class: "Economy".to_string(), count: 350 },
            ClassBookings { class: "Business".to_string(), count: 120 },
        ],
        popular_routes: vec![
            RouteBookings { route: "NYC-LON".to_string(), bookings: 120 },
            RouteBookings { route: "LON-PAR".to_string(), bookings: 95 },
        ],
        profit_margin: vec![
            QuarterMargin { category: "Q1".to_string(), percentage: 25.0 },
            QuarterMargin { category: "Q2".to_string(), percentage: 28.0 },
        ],
        feedback_comments: vec![
            "Great service \"A+\"".to_string(),
            "Business class seats are very comfortable".to_string(),
        ],
        improvement_areas: vec!["Baggage handling delays".to_string()],
        customers: Some(sample_customers()),
    }
}
