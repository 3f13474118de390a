//! Canonical report variants
//!
//! One `ReportModel` is built per request and is read-only afterwards. The
//! body is a closed sum type: every renderer matches it exhaustively.

use serde::{Deserialize, Serialize};
use skyreport_core::{CustomerRecord, DateRange, MetricsSnapshot};

/// A report ready to be rendered in any format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub date_range: Option<DateRange>,
    pub body: ReportBody,
    /// Present only when the request asked for customer data
    pub customers: Option<Vec<CustomerRecord>>,
}

impl ReportModel {
    pub fn title(&self) -> &'static str {
        self.body.title()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportBody {
    Bookings(BookingsReport),
    Revenue(RevenueReport),
    Cancellations(CancellationsReport),
    Routes(RoutesReport),
    Feedback(FeedbackReport),
    General(GeneralReport),
}

impl ReportBody {
    pub fn title(&self) -> &'static str {
        match self {
            ReportBody::Bookings(_) => "Bookings Report",
            ReportBody::Revenue(_) => "Revenue Report",
            ReportBody::Cancellations(_) => "Cancellations Report",
            ReportBody::Routes(_) => "Popular Routes Report",
            ReportBody::Feedback(_) => "Customer Feedback Report",
            ReportBody::General(_) => "General Report",
        }
    }

    /// Number of rows in the variant's detail collection
    pub fn detail_len(&self) -> usize {
        match self {
            ReportBody::Bookings(r) => r.bookings_by_day.len(),
            ReportBody::Revenue(r) => r.revenue_by_day.len(),
            ReportBody::Cancellations(r) => r.cancellations_by_day.len(),
            ReportBody::Routes(r) => r.routes.len(),
            ReportBody::Feedback(r) => r.rating_distribution.len(),
            ReportBody::General(_) => 0,
        }
    }
}

/// A destination or status filter. The request sentinel "all" (or no
/// value) means the report is unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    All,
    Only(String),
}

impl Filter {
    pub fn from_request(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Filter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => Filter::All,
            Some(v) => Filter::Only(v.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingsReport {
    pub total_bookings: u64,
    /// Already in 0-100 scale
    pub bookings_change: f64,
    pub destination: Filter,
    pub status: Filter,
    pub bookings_by_day: Vec<DailyBookings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBookings {
    pub date: String,
    pub bookings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub avg_ticket_price: f64,
    /// Already in 0-100 scale
    pub revenue_change: f64,
    pub destination: Filter,
    pub revenue_by_day: Vec<DailyFinancials>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFinancials {
    pub date: String,
    pub amount: f64,
    pub costs: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationsReport {
    pub total_cancellations: u64,
    /// 0-1 scale
    pub cancellation_rate: f64,
    pub refund_amount: f64,
    pub destination: Filter,
    pub status: Filter,
    pub cancellations_by_day: Vec<DailyCancellations>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCancellations {
    pub date: String,
    pub cancellations: u64,
}

/// Route rows carry no occupancy: it is sampled at render time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesReport {
    pub most_popular_route: String,
    pub highest_revenue_route: String,
    pub routes_analyzed: usize,
    pub destination: Filter,
    pub routes: Vec<RoutePerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePerformance {
    pub route: String,
    pub bookings: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub feedback_count: u64,
    /// 0-5 scale
    pub average_rating: f64,
    /// 0-1 scale
    pub satisfaction_rate: f64,
    pub rating_distribution: Vec<RatingBucket>,
    pub top_comments: Vec<String>,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub label: String,
    pub count: u64,
}

impl RatingBucket {
    /// Share of all feedback in this bucket, 0-1 scale
    pub fn percentage(&self, feedback_count: u64) -> f64 {
        if feedback_count == 0 {
            0.0
        } else {
            self.count as f64 / feedback_count as f64
        }
    }
}

/// Fallback for report types without a dedicated variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralReport {
    pub requested_type: String,
    pub snapshot: MetricsSnapshot,
}
