/// Spreadsheet workbook renderer
///
/// Rendering happens in two steps: `plan_workbook` lays out every cell with
/// its value and role, then `write_workbook` turns the plan into an xlsx
/// package with rust_xlsxwriter. Tests read values back from the plan.
use super::Renderer;
use crate::report::context::RenderContext;
use crate::report::document::{
    Cell, ReportDocument, Reportable, CUSTOMER_HEADERS, CUSTOMER_NOTICE, SUMMARY_HEADERS,
};
use crate::report::format::{percent_num_format, CURRENCY_NUM_FORMAT};
use crate::report::model::ReportModel;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, XlsxError};
use skyreport_core::{ReportError, ReportFormat, ReportResult};
use tracing::debug;

// Presentation constants
const HEADER_FILL: u32 = 0x171717;
const FONT_NAME: &str = "Arial";
const TITLE_SIZE: u32 = 16;
const SUBTITLE_SIZE: u32 = 10;
const SUMMARY_WIDTH: f64 = 25.0;
const SUMMARY_COLUMNS: u16 = 4;
const DETAIL_WIDTH: f64 = 20.0;
const LIST_WIDTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetRenderer;

impl Renderer for SpreadsheetRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Spreadsheet
    }

    fn render(&self, model: &ReportModel, ctx: &mut RenderContext) -> ReportResult<Vec<u8>> {
        let doc = model.to_document(ctx, self.fallback_policy())?;
        let plan = plan_workbook(&doc, &ctx.organisation);
        debug!(sheets = plan.sheets.len(), "Planned workbook");
        write_workbook(&plan).map_err(|e| ReportError::render_failure(format!("xlsx: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Title,
    Subtitle,
    Header,
    Body,
    /// Bold red security notice
    Notice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number { value: f64, num_format: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub role: CellRole,
    /// Last column of a merged range starting at `col`
    pub merge_to: Option<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct SheetPlan {
    pub name: String,
    pub cells: Vec<PlannedCell>,
    pub column_widths: Vec<(u16, f64)>,
    next_row: u32,
}

impl SheetPlan {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn push_row(&mut self, values: Vec<CellValue>, role: CellRole) {
        let row = self.next_row;
        for (col, value) in values.into_iter().enumerate() {
            self.cells.push(PlannedCell {
                row,
                col: col as u16,
                value,
                role,
                merge_to: None,
            });
        }
        self.next_row += 1;
    }

    fn push_merged(&mut self, text: String, role: CellRole, last_col: u16) {
        self.cells.push(PlannedCell {
            row: self.next_row,
            col: 0,
            value: CellValue::Text(text),
            role,
            merge_to: Some(last_col),
        });
        self.next_row += 1;
    }

    fn skip_row(&mut self) {
        self.next_row += 1;
    }

    fn set_widths(&mut self, columns: u16, width: f64) {
        self.column_widths = (0..columns).map(|c| (c, width)).collect();
    }

    /// Cell at a position, if planned
    pub fn cell(&self, row: u32, col: u16) -> Option<&PlannedCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Text shown at a position, numbers without their format code
    pub fn text_at(&self, row: u32, col: u16) -> Option<String> {
        self.cell(row, col).map(|c| match &c.value {
            CellValue::Text(s) => s.clone(),
            CellValue::Number { value, .. } => value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkbookPlan {
    pub author: String,
    pub sheets: Vec<SheetPlan>,
}

impl WorkbookPlan {
    pub fn sheet(&self, name: &str) -> Option<&SheetPlan> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn text(s: impl Into<String>) -> CellValue {
    CellValue::Text(s.into())
}

/// Detail cells keep native numbers with a format code equivalent to the
/// text renderers' string
fn detail_value(cell: &Cell) -> CellValue {
    match cell {
        Cell::Text(s) => text(s.as_str()),
        Cell::Count(n) => CellValue::Number {
            value: *n as f64,
            num_format: None,
        },
        Cell::Currency(amount) => CellValue::Number {
            value: *amount,
            num_format: Some(CURRENCY_NUM_FORMAT.to_string()),
        },
        Cell::Percent { ratio, decimals } => CellValue::Number {
            value: *ratio,
            num_format: Some(percent_num_format(*decimals)),
        },
        Cell::Occupancy(percent) => CellValue::Number {
            value: percent / 100.0,
            num_format: Some(percent_num_format(1)),
        },
    }
}

pub fn plan_workbook(doc: &ReportDocument, author: &str) -> WorkbookPlan {
    let last_col = SUMMARY_COLUMNS - 1;
    let mut summary = SheetPlan::new("Summary");
    summary.push_merged(doc.title.clone(), CellRole::Title, last_col);
    summary.push_merged(format!("Generated on: {}", doc.generated_on), CellRole::Subtitle, last_col);
    if let Some(range) = &doc.date_range {
        summary.push_merged(format!("Date Range: {}", range), CellRole::Subtitle, last_col);
    }
    if !doc.summary.is_empty() {
        summary.skip_row();
        summary.push_row(SUMMARY_HEADERS.iter().map(|h| text(*h)).collect(), CellRole::Header);
        for metric in &doc.summary {
            summary.push_row(
                vec![text(metric.label.as_str()), text(metric.value.as_str())],
                CellRole::Body,
            );
        }
    }
    summary.set_widths(SUMMARY_COLUMNS, SUMMARY_WIDTH);

    let mut sheets = vec![summary];

    if let Some(table) = &doc.detail {
        let mut detail = SheetPlan::new("Detailed Data");
        detail.push_row(table.headers.iter().map(|h| text(h.as_str())).collect(), CellRole::Header);
        for row in &table.rows {
            detail.push_row(row.iter().map(detail_value).collect(), CellRole::Body);
        }
        detail.set_widths(table.headers.len() as u16, DETAIL_WIDTH);
        sheets.push(detail);
    }

    for list in &doc.lists {
        let mut sheet = SheetPlan::new(&list.title);
        sheet.push_row(vec![text(list.header.as_str())], CellRole::Header);
        for item in &list.items {
            sheet.push_row(vec![text(item.as_str())], CellRole::Body);
        }
        sheet.set_widths(1, LIST_WIDTH);
        sheets.push(sheet);
    }

    if let Some(customers) = &doc.customers {
        let mut sheet = SheetPlan::new("Customer Data");
        sheet.push_row(CUSTOMER_HEADERS.iter().map(|h| text(*h)).collect(), CellRole::Header);
        for c in &customers.rows {
            sheet.push_row(
                vec![
                    text(c.id.as_str()),
                    text(c.name.as_str()),
                    text(c.email.as_str()),
                    text(c.phone.as_str()),
                    text(c.bookings.to_string()),
                ],
                CellRole::Body,
            );
        }
        sheet.skip_row();
        sheet.push_row(vec![text(CUSTOMER_NOTICE)], CellRole::Notice);
        sheet.set_widths(CUSTOMER_HEADERS.len() as u16, DETAIL_WIDTH);
        sheets.push(sheet);
    }

    WorkbookPlan {
        author: author.to_string(),
        sheets,
    }
}

fn role_format(role: CellRole) -> Format {
    match role {
        CellRole::Title => Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(TITLE_SIZE)
            .set_bold()
            .set_align(FormatAlign::Center),
        CellRole::Subtitle => Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(SUBTITLE_SIZE)
            .set_align(FormatAlign::Center),
        CellRole::Header => Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL)),
        CellRole::Body => Format::new(),
        CellRole::Notice => Format::new().set_bold().set_font_color(Color::Red),
    }
}

pub fn write_workbook(plan: &WorkbookPlan) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let properties = DocProperties::new()
        .set_author(&plan.author)
        .set_company(&plan.author);
    workbook.set_properties(&properties);

    for sheet_plan in &plan.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet_plan.name)?;

        for &(col, width) in &sheet_plan.column_widths {
            worksheet.set_column_width(col, width)?;
        }

        for cell in &sheet_plan.cells {
            let format = role_format(cell.role);
            match (&cell.value, cell.merge_to) {
                (CellValue::Text(s), Some(last_col)) => {
                    worksheet.merge_range(cell.row, cell.col, cell.row, last_col, s, &format)?;
                }
                (CellValue::Text(s), None) => {
                    worksheet.write_string_with_format(cell.row, cell.col, s, &format)?;
                }
                (CellValue::Number { value, num_format }, _) => {
                    let format = match num_format {
                        Some(code) => format.set_num_format(code),
                        None => format,
                    };
                    worksheet.write_number_with_format(cell.row, cell.col, *value, &format)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}
