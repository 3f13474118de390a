//! Metrics providers
//!
//! The engine treats analytics as an opaque, read-only source. A provider
//! answers one query per report build and never sees the report itself.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyreport_core::{
    ClassBookings, CustomerRecord, DailyRevenue, MetricsSnapshot, QuarterMargin, ReportError,
    ReportResult, RouteBookings, TimeScale,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of aggregate analytics for a time window
#[cfg_attr(test, mockall::automock)]
pub trait MetricsProvider: Send + Sync {
    fn get_analytics(&self, scale: TimeScale) -> ReportResult<MetricsSnapshot>;
}

/// Synthetic analytics shaped like a production booking system's output.
///
/// Totals are fixed; the daily revenue series and customer booking counts
/// are random. A seed makes the series reproducible.
#[derive(Debug, Clone, Default)]
pub struct SampleMetricsProvider {
    seed: Option<u64>,
}

const SAMPLE_ROUTES: [(&str, u64); 10] = [
    ("NYC-LON", 120),
    ("LON-PAR", 95),
    ("PAR-ROM", 85),
    ("ROM-TOK", 75),
    ("TOK-SYD", 65),
    ("SYD-NYC", 60),
    ("NYC-LAX", 55),
    ("LAX-CHI", 50),
    ("CHI-MIA", 45),
    ("MIA-NYC", 40),
];

const SAMPLE_COMMENTS: [&str; 4] = [
    "Excellent service on my flight to London",
    "The new mobile app is much easier to use",
    "Flight attendants were very professional and helpful",
    "Business class seats are very comfortable",
];

const SAMPLE_IMPROVEMENTS: [&str; 3] = [
    "In-flight meal quality on long-haul flights",
    "Check-in process at JFK and LAX airports",
    "Baggage handling delays",
];

const FIRST_NAMES: [&str; 8] = [
    "John", "Jane", "Michael", "Emily", "David", "Sarah", "Robert", "Lisa",
];
const LAST_NAMES: [&str; 8] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia",
];

impl SampleMetricsProvider {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn sample_customers(rng: &mut StdRng) -> Vec<CustomerRecord> {
        (0..50)
            .map(|i| CustomerRecord {
                id: format!("{}", i + 1),
                first_name: FIRST_NAMES[i % 8].to_string(),
                last_name: LAST_NAMES[i % 8].to_string(),
                email: format!("customer{}@example.com", i + 1),
                phone: format!("+1 555-{}", 100 + i),
                bookings_count: rng.gen_range(0..5),
            })
            .collect()
    }
}

impl MetricsProvider for SampleMetricsProvider {
    fn get_analytics(&self, scale: TimeScale) -> ReportResult<MetricsSnapshot> {
        let mut rng = self.rng();
        let days = match scale {
            TimeScale::Week => 7,
            TimeScale::Day | TimeScale::Month => 30,
        };

        let revenue_data = (0..days)
            .map(|i| DailyRevenue {
                date: format!("Day {}", i + 1),
                amount: 10000.0 + rng.gen::<f64>() * 5000.0,
                costs: 5000.0 + rng.gen::<f64>() * 2000.0,
            })
            .collect();

        let customers = Self::sample_customers(&mut rng);
        debug!(scale = scale.as_str(), days, "Generated sample analytics");

        Ok(MetricsSnapshot {
            total_revenue: 1_250_000.0,
            revenue_change: Some(12.5),
            total_bookings: 4500,
            bookings_change: Some(8.2),
            avg_ticket_price: Some(278.0),
            avg_price_change: Some(3.5),
            revenue_data,
            bookings_by_class: vec![
                ClassBookings { class: "Economy".to_string(), count: 350 },
                ClassBookings { class: "Business".to_string(), count: 120 },
                ClassBookings { class: "First Class".to_string(), count: 30 },
            ],
            popular_routes: SAMPLE_ROUTES
                .iter()
                .map(|(route, bookings)| RouteBookings {
                    route: route.to_string(),
                    bookings: *bookings,
                })
                .collect(),
            profit_margin: [("Q1", 25.0), ("Q2", 28.0), ("Q3", 32.0), ("Q4", 35.0)]
                .iter()
                .map(|(category, percentage)| QuarterMargin {
                    category: category.to_string(),
                    percentage: *percentage,
                })
                .collect(),
            feedback_comments: SAMPLE_COMMENTS.iter().map(|c| c.to_string()).collect(),
            improvement_areas: SAMPLE_IMPROVEMENTS.iter().map(|c| c.to_string()).collect(),
            customers: Some(customers),
        })
    }
}

/// Serves a snapshot stored as JSON, whatever the requested scale
#[derive(Debug, Clone)]
pub struct JsonMetricsProvider {
    path: PathBuf,
}

impl JsonMetricsProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MetricsProvider for JsonMetricsProvider {
    fn get_analytics(&self, scale: TimeScale) -> ReportResult<MetricsSnapshot> {
        let data = std::fs::read_to_string(&self.path).map_err(|e| {
            ReportError::Metrics(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        let snapshot: MetricsSnapshot = serde_json::from_str(&data).map_err(|e| {
            ReportError::Metrics(format!("Malformed snapshot {}: {}", self.path.display(), e))
        })?;
        debug!(
            path = %self.path.display(),
            scale = scale.as_str(),
            days = snapshot.revenue_data.len(),
            "Loaded analytics snapshot"
        );
        Ok(snapshot)
    }
}
