//! Page layout for the document renderer
//!
//! Coordinates are millimetres from the top-left corner of an A4 page; text
//! `y` is the baseline. Painting flips the axis for PDF.

use crate::report::document::{ReportDocument, Table, CUSTOMER_HEADERS, SUMMARY_HEADERS};
use crate::report::protect::EncryptionPath;
use skyreport_core::ReportResult;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
const CENTER_X: f64 = PAGE_WIDTH / 2.0;
const MARGIN_X: f64 = 14.0;
const TABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN_X;
const CONTINUATION_TOP: f64 = 20.0;
/// Rows never extend into the footer zone
pub const FOOTER_ZONE: f64 = PAGE_HEIGHT - 20.0;
const SECTION_GAP: f64 = 15.0;
const HEADING_TO_TABLE: f64 = 5.0;

const TITLE_SIZE: f64 = 20.0;
const META_SIZE: f64 = 10.0;
const HEADING_SIZE: f64 = 12.0;
const CELL_SIZE: f64 = 10.0;
const FOOTER_SIZE: f64 = 8.0;

const CELL_PADDING: f64 = 1.8;
const LINE_HEIGHT: f64 = 4.5;
const MIN_ROW_HEIGHT: f64 = 7.5;

pub const FOOTER_NOTICE: &str = "This report contains encrypted customer data for security purposes.";

pub type Rgb = (u8, u8, u8);
pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);
pub const HEADER_FILL: Rgb = (23, 23, 23);
pub const GRID: Rgb = (200, 200, 200);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        color: Rgb,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub ops: Vec<DrawOp>,
}

impl PagePlan {
    /// Every text run on the page, in drawing order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PagePlan>,
}

impl DocumentLayout {
    pub fn all_texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|p| p.texts()).collect()
    }
}

/// Approximate Helvetica advance: half an em per character
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.5 * 0.3528
}

/// Greedy word wrap to the given width; words longer than a line are split
fn wrap(text: &str, width: f64, size: f64) -> Vec<String> {
    let max_chars = ((width / (size * 0.5 * 0.3528)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            lines.push(head);
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn row_height(lines: usize) -> f64 {
    (lines as f64 * LINE_HEIGHT + 3.0).max(MIN_ROW_HEIGHT)
}

/// Text lines a row may hold within `space` millimetres
fn lines_that_fit(space: f64) -> usize {
    if space < MIN_ROW_HEIGHT {
        return 0;
    }
    ((space - 3.0) / LINE_HEIGHT).floor().max(0.0) as usize
}

fn wrap_cells(cells: &[String], widths: &[f64]) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| wrap(cell, w - 2.0 * CELL_PADDING, CELL_SIZE))
        .collect()
}

struct Cursor {
    pages: Vec<PagePlan>,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PagePlan::default()],
            y: 0.0,
        }
    }

    fn page(&mut self) -> &mut PagePlan {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(PagePlan::default());
        self.y = CONTINUATION_TOP;
    }

    fn text(&mut self, text: impl Into<String>, x: f64, y: f64, size: f64, bold: bool, color: Rgb) {
        self.page().ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            bold,
            color,
        });
    }

    fn centered(&mut self, text: &str, y: f64, size: f64, bold: bool) {
        let x = CENTER_X - text_width(text, size) / 2.0;
        self.text(text, x, y, size, bold, BLACK);
    }

    fn heading(&mut self, title: &str) {
        if self.y + HEADING_TO_TABLE + 2.0 * MIN_ROW_HEIGHT > FOOTER_ZONE {
            self.new_page();
        }
        let y = self.y;
        self.text(title, MARGIN_X, y, HEADING_SIZE, true, BLACK);
        self.y += HEADING_TO_TABLE;
    }

    /// Draw one row from already wrapped cell lines
    fn row(&mut self, wrapped: &[Vec<String>], header: bool, widths: &[f64]) {
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let height = row_height(lines);

        let top = self.y;
        let mut x = MARGIN_X;
        for (cell_lines, width) in wrapped.iter().zip(widths) {
            if header {
                self.page().ops.push(DrawOp::FillRect {
                    x,
                    y: top,
                    width: *width,
                    height,
                    color: HEADER_FILL,
                });
            }
            self.page().ops.push(DrawOp::StrokeRect {
                x,
                y: top,
                width: *width,
                height,
                color: GRID,
            });
            let color = if header { WHITE } else { BLACK };
            for (i, line) in cell_lines.iter().enumerate() {
                let baseline = top + 5.0 + i as f64 * LINE_HEIGHT;
                self.text(line.clone(), x + CELL_PADDING, baseline, CELL_SIZE, header, color);
            }
            x += width;
        }
        self.y = top + height;
    }

    fn continue_table(&mut self, header: &[Vec<String>], widths: &[f64]) {
        self.new_page();
        self.row(header, true, widths);
    }

    /// Grid table; the header row repeats on every continuation page. A row
    /// taller than the space left is split by lines and continues on the
    /// next page.
    fn table<F>(&mut self, headers: &[String], rows: &[Vec<String>], mut checkpoint: F) -> ReportResult<()>
    where
        F: FnMut() -> ReportResult<()>,
    {
        let columns = headers.len().max(1);
        let widths = vec![TABLE_WIDTH / columns as f64; columns];
        let header = wrap_cells(headers, &widths);
        let header_height = row_height(header.iter().map(Vec::len).max().unwrap_or(1));
        // At least one line always fits under a fresh header
        let fresh_capacity = lines_that_fit(FOOTER_ZONE - CONTINUATION_TOP - header_height).max(1);

        self.row(&header, true, &widths);
        for row in rows {
            checkpoint()?;
            let wrapped = wrap_cells(row, &widths);
            let total = wrapped.iter().map(Vec::len).max().unwrap_or(1);
            let mut start = 0;

            while start < total {
                let remaining = total - start;
                let fit = lines_that_fit(FOOTER_ZONE - self.y);
                // Keep a row whole when a fresh page can hold it
                if fit == 0 || (fit < remaining && remaining <= fresh_capacity) {
                    self.continue_table(&header, &widths);
                    continue;
                }
                let take = remaining.min(fit);
                let chunk: Vec<Vec<String>> = wrapped
                    .iter()
                    .map(|cell| cell.iter().skip(start).take(take).cloned().collect())
                    .collect();
                self.row(&chunk, false, &widths);
                start += take;
                if start < total {
                    self.continue_table(&header, &widths);
                }
            }
        }
        Ok(())
    }

    fn section<F>(&mut self, title: &str, headers: &[String], rows: &[Vec<String>], checkpoint: F) -> ReportResult<()>
    where
        F: FnMut() -> ReportResult<()>,
    {
        self.y += SECTION_GAP;
        self.heading(title);
        self.table(headers, rows, checkpoint)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table_rows(table: &Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.display()).collect())
        .collect()
}

/// Lay out the whole document. `checkpoint` runs before every table row.
pub fn layout_document<F>(doc: &ReportDocument, mut checkpoint: F) -> ReportResult<DocumentLayout>
where
    F: FnMut() -> ReportResult<()>,
{
    let mut cursor = Cursor::new();

    cursor.centered(&doc.title, 15.0, TITLE_SIZE, true);
    cursor.centered(&format!("Generated on: {}", doc.generated_on), 22.0, META_SIZE, false);
    if let Some(range) = &doc.date_range {
        cursor.centered(&format!("Date Range: {}", range), 27.0, META_SIZE, false);
    }
    if let Some(customers) = &doc.customers {
        let line = match customers.path {
            EncryptionPath::Primary => "Contact fields protected with: primary encryption",
            EncryptionPath::ReversibleFallback => {
                "Contact fields protected with: reversible base64 fallback (not encryption)"
            }
        };
        cursor.centered(line, 32.0, FOOTER_SIZE, false);
    }
    cursor.y = 40.0;

    if !doc.summary.is_empty() {
        cursor.heading("Report Summary");
        let rows: Vec<Vec<String>> = doc
            .summary
            .iter()
            .map(|m| vec![m.label.clone(), m.value.clone()])
            .collect();
        cursor.table(&strings(&SUMMARY_HEADERS), &rows, &mut checkpoint)?;
    }

    if let Some(table) = &doc.detail {
        cursor.section("Detailed Data", &table.headers, &table_rows(table), &mut checkpoint)?;
    }

    for list in &doc.lists {
        let rows: Vec<Vec<String>> = list.items.iter().map(|item| vec![item.clone()]).collect();
        cursor.section(&list.title, &[list.header.clone()], &rows, &mut checkpoint)?;
    }

    if let Some(customers) = &doc.customers {
        let rows: Vec<Vec<String>> = customers
            .rows
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    c.name.clone(),
                    c.email.clone(),
                    c.phone.clone(),
                    c.bookings.to_string(),
                ]
            })
            .collect();
        cursor.section(
            "Customer Data (Sensitive Information Encrypted)",
            &strings(&CUSTOMER_HEADERS),
            &rows,
            &mut checkpoint,
        )?;
    }

    // Footers need the final page count
    let total = cursor.pages.len();
    for (i, page) in cursor.pages.iter_mut().enumerate() {
        for (text, y) in [
            (FOOTER_NOTICE.to_string(), PAGE_HEIGHT - 10.0),
            (format!("Page {} of {}", i + 1, total), PAGE_HEIGHT - 5.0),
        ] {
            let x = CENTER_X - text_width(&text, FOOTER_SIZE) / 2.0;
            page.ops.push(DrawOp::Text {
                text,
                x,
                y,
                size: FOOTER_SIZE,
                bold: false,
                color: BLACK,
            });
        }
    }

    Ok(DocumentLayout { pages: cursor.pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{Cell, CustomerTable, ListSection, Metric, ProtectedCustomer};
    use skyreport_core::ReportError;

    fn document(rows: usize) -> ReportDocument {
        let mut detail = Table::new(&["Date", "Bookings"]);
        for i in 0..rows {
            detail.add_row(vec![format!("Day {}", i + 1).into(), Cell::Count(40 + i as u64)]);
        }
        ReportDocument {
            title: "Bookings Report".to_string(),
            generated_on: "03/09/2024".to_string(),
            date_range: None,
            summary: vec![
                Metric::new("Total Bookings", "4,500"),
                Metric::new("Destination", "All Destinations"),
            ],
            detail: if rows == 0 { None } else { Some(detail) },
            lists: vec![],
            customers: None,
        }
    }

    fn ok() -> ReportResult<()> {
        Ok(())
    }

    #[test]
    fn test_single_page_layout() {
        let layout = layout_document(&document(5), ok).unwrap();
        assert_eq!(layout.pages.len(), 1);

        let texts = layout.all_texts();
        assert_eq!(texts[0], "Bookings Report");
        assert!(texts.contains(&"Report Summary"));
        assert!(texts.contains(&"Detailed Data"));
        assert!(texts.contains(&"All Destinations"));
        assert!(texts.contains(&"Page 1 of 1"));
        assert!(texts.contains(&FOOTER_NOTICE));
    }

    #[test]
    fn test_long_tables_paginate_with_footers() {
        let layout = layout_document(&document(80), ok).unwrap();
        let total = layout.pages.len();
        assert!(total > 1);

        for (i, page) in layout.pages.iter().enumerate() {
            let texts = page.texts();
            assert!(texts.contains(&FOOTER_NOTICE));
            let stamp = format!("Page {} of {}", i + 1, total);
            assert!(texts.contains(&stamp.as_str()));
            if i > 0 {
                // Header row repeated
                assert!(texts.contains(&"Date"));
            }
        }

        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::StrokeRect { y, height, .. } = op {
                    assert!(y + height <= FOOTER_ZONE + 1e-9);
                }
            }
        }
    }

    fn body_texts(layout: &DocumentLayout) -> Vec<(&str, f64)> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { text, y, size, .. } if *size != FOOTER_SIZE => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_oversized_row_continues_on_next_pages() {
        let mut doc = document(3);
        doc.lists.push(ListSection {
            title: "Top Comments".to_string(),
            header: "Comments".to_string(),
            items: vec!["word ".repeat(3000), "Short comment".to_string()],
        });
        let layout = layout_document(&doc, ok).unwrap();
        assert!(layout.pages.len() > 2);

        let texts = body_texts(&layout);
        for (text, y) in &texts {
            assert!(*y <= FOOTER_ZONE, "{:?} drawn at y={} inside the footer zone", text, y);
        }
        let words: usize = texts
            .iter()
            .map(|(t, _)| t.split_whitespace().filter(|w| *w == "word").count())
            .sum();
        assert_eq!(words, 3000);
        assert!(texts.iter().any(|(t, _)| *t == "Short comment"));

        // Every continuation page repeats the list header
        for page in &layout.pages[1..] {
            assert!(page.texts().contains(&"Comments"));
        }
    }

    #[test]
    fn test_lines_that_fit() {
        assert_eq!(lines_that_fit(MIN_ROW_HEIGHT - 0.1), 0);
        assert_eq!(lines_that_fit(MIN_ROW_HEIGHT), 1);
        assert_eq!(lines_that_fit(3.0 + 10.0 * LINE_HEIGHT), 10);
        assert!(row_height(lines_that_fit(100.0)) <= 100.0);
    }

    #[test]
    fn test_degenerate_has_no_detail_heading() {
        let layout = layout_document(&document(0), ok).unwrap();
        assert!(!layout.all_texts().contains(&"Detailed Data"));
    }

    #[test]
    fn test_encryption_path_is_printed() {
        let mut doc = document(1);
        doc.customers = Some(CustomerTable {
            path: EncryptionPath::ReversibleFallback,
            rows: vec![ProtectedCustomer {
                id: "1".to_string(),
                name: "Jane Doe".to_string(),
                email: "YUBiLmNvbQ==".to_string(),
                phone: "KzEgNTU1LTEwMA==".to_string(),
                bookings: 1,
            }],
        });
        let layout = layout_document(&doc, ok).unwrap();
        let texts = layout.all_texts();
        assert!(texts
            .iter()
            .any(|t| t.contains("reversible base64 fallback")));
        assert!(texts.contains(&"YUBiLmNvbQ=="));
    }

    #[test]
    fn test_checkpoint_aborts_layout() {
        let mut calls = 0;
        let result = layout_document(&document(50), || {
            calls += 1;
            if calls > 10 {
                Err(ReportError::Cancelled)
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(ReportError::Cancelled)));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("short", 50.0, 10.0), vec!["short"]);
        let lines = wrap("Flight attendants were very professional and helpful", 20.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 11));
        assert_eq!(wrap("", 20.0, 10.0), vec![""]);
    }
}
