/// Format-neutral projection of a report model
///
/// Renderers never inspect `ReportBody` themselves. `Reportable::to_document`
/// matches the variant once, applies the shared formatting rules, samples the
/// per-render occupancy values and protects customer contact fields, so the
/// three backends only decide layout.
use super::context::RenderContext;
use super::format::{
    destination_label, format_count, format_currency, format_occupancy, format_rating,
    format_ratio_percent, format_scaled_percent, format_timestamp, occupancy_rate, status_label,
};
use super::model::{ReportBody, ReportModel};
use super::protect::{EncryptionPath, FallbackPolicy};
use serde::{Deserialize, Serialize};
use skyreport_core::ReportResult;

pub const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];
pub const CUSTOMER_HEADERS: [&str; 5] =
    ["ID", "Name", "Email (Encrypted)", "Phone (Encrypted)", "Bookings"];
pub const CUSTOMER_NOTICE: &str = "NOTE: Email and phone data are encrypted for security purposes.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    /// Generation timestamp in the configured date format
    pub generated_on: String,
    /// "<from> to <to>" when the request carried a range
    pub date_range: Option<String>,
    /// Empty for the general report
    pub summary: Vec<Metric>,
    /// `None` when the variant's detail collection is empty
    pub detail: Option<Table>,
    pub lists: Vec<ListSection>,
    pub customers: Option<CustomerTable>,
}

impl ReportDocument {
    /// Title and timestamp only
    pub fn is_minimal(&self) -> bool {
        self.summary.is_empty() && self.detail.is_none() && self.lists.is_empty()
    }
}

/// One summary row, already formatted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }
}

/// A detail value. Text renderers use [`Cell::display`]; the spreadsheet
/// writes the number with the equivalent format code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    /// Plain integer, no grouping
    Count(u64),
    Currency(f64),
    /// 0-1 ratio shown with `decimals` places
    Percent { ratio: f64, decimals: usize },
    /// 0-100 scale, one decimal
    Occupancy(f64),
}

impl Cell {
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Currency(amount) => format_currency(*amount),
            Cell::Percent { ratio, decimals } => format_ratio_percent(*ratio, *decimals),
            Cell::Occupancy(percent) => format_occupancy(*percent),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// A titled single-column list, e.g. top comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub header: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerTable {
    pub path: EncryptionPath,
    pub rows: Vec<ProtectedCustomer>,
}

/// Customer row whose contact fields went through the protector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedCustomer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub bookings: u32,
}

/// Types that can be projected into a [`ReportDocument`]
pub trait Reportable {
    fn to_document(
        &self,
        ctx: &mut RenderContext,
        policy: FallbackPolicy,
    ) -> ReportResult<ReportDocument>;
}

impl Reportable for ReportModel {
    fn to_document(
        &self,
        ctx: &mut RenderContext,
        policy: FallbackPolicy,
    ) -> ReportResult<ReportDocument> {
        let mut summary = Vec::new();
        let mut lists = Vec::new();

        let detail = match &self.body {
            ReportBody::Bookings(r) => {
                summary.push(Metric::new("Total Bookings", format_count(r.total_bookings)));
                summary.push(Metric::new("Booking Growth", format_scaled_percent(r.bookings_change)));
                summary.push(Metric::new("Destination", destination_label(&r.destination)));
                summary.push(Metric::new("Status", status_label(&r.status)));

                let mut table = Table::new(&["Date", "Bookings"]);
                for day in &r.bookings_by_day {
                    ctx.checkpoint()?;
                    table.add_row(vec![day.date.as_str().into(), Cell::Count(day.bookings)]);
                }
                table
            }
            ReportBody::Revenue(r) => {
                summary.push(Metric::new("Total Revenue", format_currency(r.total_revenue)));
                summary.push(Metric::new("Average Ticket Price", format_currency(r.avg_ticket_price)));
                summary.push(Metric::new("Revenue Growth", format_scaled_percent(r.revenue_change)));
                summary.push(Metric::new("Destination", destination_label(&r.destination)));

                let mut table = Table::new(&["Date", "Revenue", "Costs", "Profit"]);
                for day in &r.revenue_by_day {
                    ctx.checkpoint()?;
                    table.add_row(vec![
                        day.date.as_str().into(),
                        Cell::Currency(day.amount),
                        Cell::Currency(day.costs),
                        Cell::Currency(day.profit),
                    ]);
                }
                table
            }
            ReportBody::Cancellations(r) => {
                summary.push(Metric::new("Total Cancellations", format_count(r.total_cancellations)));
                summary.push(Metric::new("Cancellation Rate", format_ratio_percent(r.cancellation_rate, 1)));
                summary.push(Metric::new("Refund Amount", format_currency(r.refund_amount)));
                summary.push(Metric::new("Destination", destination_label(&r.destination)));
                summary.push(Metric::new("Status", status_label(&r.status)));

                let mut table = Table::new(&["Date", "Cancellations"]);
                for day in &r.cancellations_by_day {
                    ctx.checkpoint()?;
                    table.add_row(vec![day.date.as_str().into(), Cell::Count(day.cancellations)]);
                }
                table
            }
            ReportBody::Routes(r) => {
                summary.push(Metric::new("Most Popular Route", r.most_popular_route.as_str()));
                summary.push(Metric::new("Highest Revenue Route", r.highest_revenue_route.as_str()));
                summary.push(Metric::new("Routes Analyzed", r.routes_analyzed.to_string()));
                summary.push(Metric::new("Destination", destination_label(&r.destination)));

                let mut table = Table::new(&["Route", "Bookings", "Revenue", "Occupancy Rate"]);
                for route in &r.routes {
                    ctx.checkpoint()?;
                    let occupancy = occupancy_rate(&mut ctx.rng, ctx.occupancy_min, ctx.occupancy_max);
                    table.add_row(vec![
                        route.route.as_str().into(),
                        Cell::Count(route.bookings),
                        Cell::Currency(route.revenue),
                        Cell::Occupancy(occupancy),
                    ]);
                }
                table
            }
            ReportBody::Feedback(r) => {
                summary.push(Metric::new("Total Feedback", format_count(r.feedback_count)));
                summary.push(Metric::new("Average Rating", format_rating(r.average_rating)));
                summary.push(Metric::new("Satisfaction Rate", format_ratio_percent(r.satisfaction_rate, 0)));

                let mut table = Table::new(&["Rating", "Count", "Percentage"]);
                for bucket in &r.rating_distribution {
                    ctx.checkpoint()?;
                    table.add_row(vec![
                        bucket.label.as_str().into(),
                        Cell::Count(bucket.count),
                        Cell::Percent {
                            ratio: bucket.percentage(r.feedback_count),
                            decimals: 1,
                        },
                    ]);
                }

                if !r.top_comments.is_empty() {
                    lists.push(ListSection {
                        title: "Top Comments".to_string(),
                        header: "Comments".to_string(),
                        items: r.top_comments.clone(),
                    });
                }
                if !r.improvement_areas.is_empty() {
                    lists.push(ListSection {
                        title: "Areas for Improvement".to_string(),
                        header: "Improvement Areas".to_string(),
                        items: r.improvement_areas.clone(),
                    });
                }
                table
            }
            ReportBody::General(_) => Table::new(&[]),
        };

        let customers = match &self.customers {
            Some(records) => {
                let path = ctx.protector.select_path(policy)?;
                ctx.record_encryption_path(path);
                let mut rows = Vec::with_capacity(records.len());
                for record in records {
                    ctx.checkpoint()?;
                    rows.push(ProtectedCustomer {
                        id: record.id.clone(),
                        name: record.full_name(),
                        email: ctx.protector.protect(path, &record.email)?,
                        phone: ctx.protector.protect(path, &record.phone)?,
                        bookings: record.bookings_count,
                    });
                }
                Some(CustomerTable { path, rows })
            }
            None => None,
        };

        Ok(ReportDocument {
            title: self.title().to_string(),
            generated_on: format_timestamp(&ctx.generated_at, &ctx.date_format),
            date_range: self.date_range.map(|r| r.display_with(&ctx.date_format)),
            summary,
            detail: if detail.rows.is_empty() { None } else { Some(detail) },
            lists,
            customers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::*;
    use crate::report::protect::{ContactProtector, EncryptionError, Encryptor};
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use skyreport_core::{CustomerRecord, DateRange, EngineConfig, ReportError};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    struct Tagged;

    impl Encryptor for Tagged {
        fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
            Ok(format!("enc({})", plaintext.len()))
        }
    }

    fn ctx(protector: ContactProtector) -> RenderContext {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        RenderContext::new(at, &EngineConfig::default(), protector).with_rng(StdRng::seed_from_u64(5))
    }

    fn routes_model() -> ReportModel {
        ReportModel {
            date_range: Some(
                DateRange::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                )
                .unwrap(),
            ),
            body: ReportBody::Routes(RoutesReport {
                most_popular_route: "NYC-LON".to_string(),
                highest_revenue_route: "NYC-LON".to_string(),
                routes_analyzed: 2,
                destination: Filter::All,
                routes: vec![
                    RoutePerformance { route: "NYC-LON".to_string(), bookings: 120, revenue: 33360.0 },
                    RoutePerformance { route: "LON-PAR".to_string(), bookings: 95, revenue: 26410.0 },
                ],
            }),
            customers: None,
        }
    }

    #[test]
    fn test_routes_projection() {
        let doc = routes_model()
            .to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly)
            .unwrap();

        assert_eq!(doc.title, "Popular Routes Report");
        assert_eq!(doc.generated_on, "03/09/2024");
        assert_eq!(doc.date_range.as_deref(), Some("01/01/2024 to 01/31/2024"));
        assert_eq!(doc.summary[3], Metric::new("Destination", "All Destinations"));

        let detail = doc.detail.unwrap();
        assert_eq!(detail.headers, vec!["Route", "Bookings", "Revenue", "Occupancy Rate"]);
        assert_eq!(detail.rows[0][2].display(), "$33,360.00");
        match detail.rows[0][3] {
            Cell::Occupancy(p) => assert!((65.0..=95.0).contains(&p)),
            ref other => panic!("expected occupancy, got {:?}", other),
        }
    }

    #[test]
    fn test_occupancy_follows_rng_seed() {
        let model = routes_model();
        let a = model.to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly).unwrap();
        let b = model.to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly).unwrap();
        assert_eq!(a.detail.unwrap().rows, b.detail.unwrap().rows);
    }

    #[test]
    fn test_empty_detail_is_summary_only() {
        let model = ReportModel {
            date_range: None,
            body: ReportBody::Bookings(BookingsReport {
                total_bookings: 4500,
                bookings_change: 8.2,
                destination: Filter::Only("Rome".to_string()),
                status: Filter::All,
                bookings_by_day: vec![],
            }),
            customers: None,
        };
        let doc = model
            .to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly)
            .unwrap();
        assert!(doc.detail.is_none());
        assert_eq!(doc.summary[0].value, "4,500");
        assert_eq!(doc.summary[1].value, "8.2%");
        assert_eq!(doc.summary[2].value, "Rome");
        assert!(doc.date_range.is_none());
    }

    #[test]
    fn test_general_is_minimal() {
        let model = ReportModel {
            date_range: None,
            body: ReportBody::General(GeneralReport {
                requested_type: "loyalty".to_string(),
                snapshot: Default::default(),
            }),
            customers: None,
        };
        let doc = model
            .to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly)
            .unwrap();
        assert!(doc.is_minimal());
        assert_eq!(doc.title, "General Report");
    }

    #[test]
    fn test_customers_are_protected() {
        let mut model = routes_model();
        model.customers = Some(vec![CustomerRecord {
            id: "7".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "a@b.com".to_string(),
            phone: "+1 555-100".to_string(),
            bookings_count: 3,
        }]);

        let mut context = ctx(ContactProtector::new(Some(Arc::new(Tagged))));
        let doc = model.to_document(&mut context, FallbackPolicy::PrimaryOnly).unwrap();
        let customers = doc.customers.unwrap();
        assert_eq!(customers.path, EncryptionPath::Primary);
        assert_eq!(customers.rows[0].name, "Jane Doe");
        assert_eq!(customers.rows[0].email, "enc(7)");
        assert_ne!(customers.rows[0].email, "a@b.com");
        assert_eq!(context.encryption_path(), Some(EncryptionPath::Primary));

        // No primitive and no fallback allowed
        let result = model.to_document(&mut ctx(ContactProtector::default()), FallbackPolicy::PrimaryOnly);
        assert!(matches!(result, Err(ReportError::RenderFailure(_))));
    }

    #[test]
    fn test_cancel_flag_stops_projection() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut context = ctx(ContactProtector::default()).with_cancel_flag(flag);
        let result = routes_model().to_document(&mut context, FallbackPolicy::PrimaryOnly);
        assert!(matches!(result, Err(ReportError::Cancelled)));
    }
}
