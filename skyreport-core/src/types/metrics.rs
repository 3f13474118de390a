//! Aggregate analytics consumed by the report builder
//!
//! A `MetricsSnapshot` is read-only input for one report build. Optional
//! fields are optional because some providers do not supply them; report
//! types that need a missing field fail with `InvalidRequest`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_revenue: f64,
    #[serde(default)]
    pub revenue_change: Option<f64>,
    pub total_bookings: u64,
    /// Period-over-period change, already in 0-100 scale
    #[serde(default)]
    pub bookings_change: Option<f64>,
    #[serde(default)]
    pub avg_ticket_price: Option<f64>,
    #[serde(default)]
    pub avg_price_change: Option<f64>,
    #[serde(default)]
    pub revenue_data: Vec<DailyRevenue>,
    #[serde(default)]
    pub bookings_by_class: Vec<ClassBookings>,
    #[serde(default)]
    pub popular_routes: Vec<RouteBookings>,
    #[serde(default)]
    pub profit_margin: Vec<QuarterMargin>,
    #[serde(default)]
    pub feedback_comments: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub customers: Option<Vec<CustomerRecord>>,
}

impl MetricsSnapshot {
    /// Sum of daily revenue amounts
    pub fn daily_revenue_total(&self) -> f64 {
        self.revenue_data.iter().map(|day| day.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// Period label, e.g. "Day 3"
    pub date: String,
    pub amount: f64,
    pub costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBookings {
    pub class: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBookings {
    pub route: String,
    pub bookings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterMargin {
    pub category: String,
    pub percentage: f64,
}

/// Customer row attached to a report. `email` and `phone` are sensitive
/// and must never reach an output stream unprotected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub bookings_count: u32,
}

impl CustomerRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
