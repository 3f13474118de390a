/// Delimited-text renderer
use super::Renderer;
use crate::report::context::RenderContext;
use crate::report::document::{
    ReportDocument, Reportable, Table, CUSTOMER_HEADERS, CUSTOMER_NOTICE, SUMMARY_HEADERS,
};
use crate::report::format::escape_quoted;
use crate::report::model::ReportModel;
use skyreport_core::{ReportFormat, ReportResult};

/// Every field is quote-wrapped with inner quotes doubled; sections are
/// separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(&self, model: &ReportModel, ctx: &mut RenderContext) -> ReportResult<Vec<u8>> {
        let doc = model.to_document(ctx, self.fallback_policy())?;
        Ok(render_csv(&doc).into_bytes())
    }
}

pub fn render_csv(doc: &ReportDocument) -> String {
    let mut output = String::new();

    write_row(&mut output, &[doc.title.as_str()]);
    write_row(&mut output, &["Generated on", doc.generated_on.as_str()]);
    if let Some(range) = &doc.date_range {
        write_row(&mut output, &["Date Range", range.as_str()]);
    }

    if !doc.summary.is_empty() {
        output.push('\n');
        write_row(&mut output, &["Summary Data"]);
        write_row(&mut output, &SUMMARY_HEADERS);
        for metric in &doc.summary {
            write_row(&mut output, &[metric.label.as_str(), metric.value.as_str()]);
        }
    }

    if let Some(table) = &doc.detail {
        output.push('\n');
        write_row(&mut output, &["Detailed Data"]);
        render_table(&mut output, table);
    }

    for list in &doc.lists {
        output.push('\n');
        write_row(&mut output, &[list.title.as_str()]);
        for item in &list.items {
            write_row(&mut output, &[item.as_str()]);
        }
    }

    if let Some(customers) = &doc.customers {
        output.push('\n');
        write_row(&mut output, &["Customer Data (Sensitive Information Encrypted)"]);
        write_row(&mut output, &CUSTOMER_HEADERS);
        for c in &customers.rows {
            let bookings = c.bookings.to_string();
            write_row(
                &mut output,
                &[
                    c.id.as_str(),
                    c.name.as_str(),
                    c.email.as_str(),
                    c.phone.as_str(),
                    bookings.as_str(),
                ],
            );
        }
        output.push('\n');
        write_row(&mut output, &[CUSTOMER_NOTICE]);
    }

    output
}

fn render_table(output: &mut String, table: &Table) {
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    write_row(output, &headers);
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| c.display()).collect();
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        write_row(output, &cells);
    }
}

fn write_row(output: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push('"');
        output.push_str(&escape_quoted(field));
        output.push('"');
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{Cell, CustomerTable, ListSection, Metric, ProtectedCustomer};
    use crate::report::protect::EncryptionPath;
    use pretty_assertions::assert_eq;

    fn document() -> ReportDocument {
        let mut detail = Table::new(&["Rating", "Count", "Percentage"]);
        detail.add_row(vec![
            "5 Stars".into(),
            Cell::Count(708),
            Cell::Percent { ratio: 0.45, decimals: 1 },
        ]);
        ReportDocument {
            title: "Customer Feedback Report".to_string(),
            generated_on: "03/09/2024".to_string(),
            date_range: None,
            summary: vec![Metric::new("Total Feedback", "1,575")],
            detail: Some(detail),
            lists: vec![ListSection {
                title: "Top Comments".to_string(),
                header: "Comments".to_string(),
                items: vec!["Great service \"A+\"".to_string()],
            }],
            customers: None,
        }
    }

    #[test]
    fn test_layout() {
        let expected = concat!(
            "\"Customer Feedback Report\"\n",
            "\"Generated on\",\"03/09/2024\"\n",
            "\n",
            "\"Summary Data\"\n",
            "\"Metric\",\"Value\"\n",
            "\"Total Feedback\",\"1,575\"\n",
            "\n",
            "\"Detailed Data\"\n",
            "\"Rating\",\"Count\",\"Percentage\"\n",
            "\"5 Stars\",\"708\",\"45.0%\"\n",
            "\n",
            "\"Top Comments\"\n",
            "\"Great service \"\"A+\"\"\"\n",
        );
        assert_eq!(render_csv(&document()), expected);
    }

    #[test]
    fn test_customer_section() {
        let mut doc = document();
        doc.customers = Some(CustomerTable {
            path: EncryptionPath::Primary,
            rows: vec![ProtectedCustomer {
                id: "1".to_string(),
                name: "Jane Doe".to_string(),
                email: "enc:abc".to_string(),
                phone: "enc:def".to_string(),
                bookings: 2,
            }],
        });
        let output = render_csv(&doc);
        assert!(output.contains("\"Customer Data (Sensitive Information Encrypted)\"\n"));
        assert!(output.contains("\"1\",\"Jane Doe\",\"enc:abc\",\"enc:def\",\"2\"\n"));
        assert!(output.ends_with(
            "\n\"NOTE: Email and phone data are encrypted for security purposes.\"\n"
        ));
    }

    #[test]
    fn test_minimal_document() {
        let doc = ReportDocument {
            title: "General Report".to_string(),
            generated_on: "03/09/2024".to_string(),
            date_range: Some("01/01/2024 to 01/31/2024".to_string()),
            summary: vec![],
            detail: None,
            lists: vec![],
            customers: None,
        };
        assert_eq!(
            render_csv(&doc),
            "\"General Report\"\n\"Generated on\",\"03/09/2024\"\n\"Date Range\",\"01/01/2024 to 01/31/2024\"\n"
        );
    }
}
