//! Model builder: (type, request, snapshot) -> canonical report variant

use super::format::{floor_share, route_revenue};
use super::model::*;
use skyreport_core::config::PolicyConfig;
use skyreport_core::{MetricsSnapshot, ReportError, ReportRequest, ReportResult, ReportType};
use tracing::{debug, warn};

const RATING_LABELS: [&str; 5] = ["5 Stars", "4 Stars", "3 Stars", "2 Stars", "1 Star"];

/// Builds a [`ReportModel`] from a metrics snapshot.
///
/// Every derived field is a deterministic function of the snapshot and the
/// policy ratios. Occupancy is not derived here; it is sampled per render.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    policy: PolicyConfig,
}

impl ModelBuilder {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn build(
        &self,
        report_type: &ReportType,
        request: &ReportRequest,
        metrics: &MetricsSnapshot,
    ) -> ReportResult<ReportModel> {
        let body = match report_type {
            ReportType::Bookings => ReportBody::Bookings(self.bookings(request, metrics)?),
            ReportType::Revenue => ReportBody::Revenue(self.revenue(request, metrics)?),
            ReportType::Cancellations => ReportBody::Cancellations(self.cancellations(request, metrics)),
            ReportType::Routes => ReportBody::Routes(self.routes(request, metrics)),
            ReportType::Feedback => ReportBody::Feedback(self.feedback(metrics)),
            ReportType::Other(name) => {
                warn!(report_type = %name, "Unknown report type, building a general report");
                ReportBody::General(GeneralReport {
                    requested_type: name.clone(),
                    snapshot: metrics.clone(),
                })
            }
        };

        let customers = if request.include_customer_data {
            match &metrics.customers {
                Some(customers) => Some(customers.clone()),
                None => {
                    return Err(ReportError::invalid_request(
                        "customer data requested but the metrics snapshot has no customer list",
                    ))
                }
            }
        } else {
            None
        };

        debug!(
            title = body.title(),
            detail_rows = body.detail_len(),
            customers = customers.as_ref().map(Vec::len).unwrap_or(0),
            "Built report model"
        );

        Ok(ReportModel {
            date_range: request.date_range,
            body,
            customers,
        })
    }

    fn bookings(&self, request: &ReportRequest, metrics: &MetricsSnapshot) -> ReportResult<BookingsReport> {
        let avg_price = require_ticket_price(metrics, "bookings")?;
        let bookings_change = metrics
            .bookings_change
            .ok_or_else(|| missing_field("bookingsChange", "bookings"))?;

        Ok(BookingsReport {
            total_bookings: metrics.total_bookings,
            bookings_change,
            destination: Filter::from_request(request.destination.as_deref()),
            status: Filter::from_request(request.status.as_deref()),
            bookings_by_day: metrics
                .revenue_data
                .iter()
                .map(|day| DailyBookings {
                    date: day.date.clone(),
                    bookings: floor_share(day.amount / avg_price, 1.0),
                })
                .collect(),
        })
    }

    fn revenue(&self, request: &ReportRequest, metrics: &MetricsSnapshot) -> ReportResult<RevenueReport> {
        let avg_ticket_price = require_ticket_price(metrics, "revenue")?;
        let revenue_change = metrics
            .revenue_change
            .ok_or_else(|| missing_field("revenueChange", "revenue"))?;

        Ok(RevenueReport {
            total_revenue: metrics.total_revenue,
            avg_ticket_price,
            revenue_change,
            destination: Filter::from_request(request.destination.as_deref()),
            revenue_by_day: metrics
                .revenue_data
                .iter()
                .map(|day| DailyFinancials {
                    date: day.date.clone(),
                    amount: day.amount,
                    costs: day.costs,
                    profit: day.amount - day.costs,
                })
                .collect(),
        })
    }

    fn cancellations(&self, request: &ReportRequest, metrics: &MetricsSnapshot) -> CancellationsReport {
        let rate = self.policy.cancellation_rate;
        let total_cancellations = floor_share(metrics.total_bookings as f64, rate);
        let refund_amount = floor_share(metrics.total_revenue, self.policy.refund_fraction) as f64;

        // Spread the total over the series by each day's share of revenue
        let revenue_total = metrics.daily_revenue_total();
        let cancellations_by_day = metrics
            .revenue_data
            .iter()
            .map(|day| DailyCancellations {
                date: day.date.clone(),
                cancellations: if revenue_total > 0.0 {
                    floor_share(total_cancellations as f64, day.amount / revenue_total)
                } else {
                    0
                },
            })
            .collect();

        CancellationsReport {
            total_cancellations,
            cancellation_rate: rate,
            refund_amount,
            destination: Filter::from_request(request.destination.as_deref()),
            status: Filter::from_request(request.status.as_deref()),
            cancellations_by_day,
        }
    }

    fn routes(&self, request: &ReportRequest, metrics: &MetricsSnapshot) -> RoutesReport {
        let routes: Vec<RoutePerformance> = metrics
            .popular_routes
            .iter()
            .map(|r| RoutePerformance {
                route: r.route.clone(),
                bookings: r.bookings,
                revenue: route_revenue(
                    r.bookings,
                    metrics.avg_ticket_price,
                    self.policy.fallback_ticket_price,
                ),
            })
            .collect();

        let most_popular_route = first_max_by(&routes, |r| r.bookings as f64);
        let highest_revenue_route = first_max_by(&routes, |r| r.revenue);

        RoutesReport {
            most_popular_route,
            highest_revenue_route,
            routes_analyzed: routes.len(),
            destination: Filter::from_request(request.destination.as_deref()),
            routes,
        }
    }

    fn feedback(&self, metrics: &MetricsSnapshot) -> FeedbackReport {
        let feedback_count = floor_share(
            metrics.total_bookings as f64,
            self.policy.feedback_response_rate,
        );

        // Floored buckets may sum to less than feedback_count
        let rating_distribution = RATING_LABELS
            .iter()
            .zip(self.policy.rating_shares.iter())
            .map(|(label, share)| RatingBucket {
                label: label.to_string(),
                count: floor_share(feedback_count as f64, *share),
            })
            .collect();

        FeedbackReport {
            feedback_count,
            average_rating: self.policy.average_rating,
            satisfaction_rate: self.policy.satisfaction_rate,
            rating_distribution,
            top_comments: metrics.feedback_comments.clone(),
            improvement_areas: metrics.improvement_areas.clone(),
        }
    }
}

fn missing_field(field: &str, report: &str) -> ReportError {
    ReportError::invalid_request(format!(
        "{} report requires '{}' in the metrics snapshot",
        report, field
    ))
}

fn require_ticket_price(metrics: &MetricsSnapshot, report: &str) -> ReportResult<f64> {
    match metrics.avg_ticket_price {
        Some(price) if price > 0.0 => Ok(price),
        _ => Err(missing_field("avgTicketPrice", report)),
    }
}

/// Route name with the largest key, first wins on ties; "N/A" when empty
fn first_max_by(routes: &[RoutePerformance], key: impl Fn(&RoutePerformance) -> f64) -> String {
    let mut best: Option<&RoutePerformance> = None;
    for route in routes {
        match best {
            Some(current) if key(route) <= key(current) => {}
            _ => best = Some(route),
        }
    }
    best.map(|r| r.route.clone())
        .unwrap_or_else(|| "N/A".to_string())
}
