//! Paginated document renderer
//!
//! `layout` computes pages and draw operations; this module paints them
//! with printpdf. Customer contact fields may use the reversible fallback
//! here, and only here, when the renderer is built with it allowed.

pub mod layout;

pub use layout::{layout_document, DocumentLayout, DrawOp, PagePlan};

use super::Renderer;
use crate::report::context::RenderContext;
use crate::report::document::Reportable;
use crate::report::model::ReportModel;
use crate::report::protect::FallbackPolicy;
use layout::{Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
};
use skyreport_core::{ReportError, ReportFormat, ReportResult};
use std::io::{BufWriter, Cursor};
use tracing::debug;

/// PDF backend.
///
/// Text is set in the builtin Helvetica faces, which only carry the
/// WinAnsi (Windows-1252) character set. Latin-1 text such as "São Paulo"
/// renders as-is; characters outside WinAnsi are painted as `?`.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRenderer {
    allow_fallback: bool,
}

impl DocumentRenderer {
    pub fn new(allow_fallback: bool) -> Self {
        Self { allow_fallback }
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer for DocumentRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Document
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        if self.allow_fallback {
            FallbackPolicy::AllowReversible
        } else {
            FallbackPolicy::PrimaryOnly
        }
    }

    fn render(&self, model: &ReportModel, ctx: &mut RenderContext) -> ReportResult<Vec<u8>> {
        let doc = model.to_document(ctx, self.fallback_policy())?;
        let layout = layout_document(&doc, || ctx.checkpoint())?;
        debug!(pages = layout.pages.len(), "Laid out document");
        paint(&doc.title, &layout)
    }
}

fn pdf_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::render_failure(format!("pdf: {}", e))
}

fn color((r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Characters WinAnsi places in 0x80..=0x9F
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Replace characters the builtin fonts cannot encode with `?`
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c,
            _ if WIN_ANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}

/// Flip a top-origin y coordinate to PDF's bottom-left origin
fn pdf_y(y: f64) -> Mm {
    Mm((PAGE_HEIGHT - y) as f32)
}

fn paint_op(layer: &PdfLayerReference, op: &DrawOp, regular: &IndirectFontRef, bold: &IndirectFontRef) {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            bold: is_bold,
            color: rgb,
        } => {
            layer.set_fill_color(color(*rgb));
            let font = if *is_bold { bold } else { regular };
            layer.use_text(to_win_ansi(text), *size as f32, Mm(*x as f32), pdf_y(*y), font);
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: rgb,
        } => {
            layer.set_fill_color(color(*rgb));
            layer.add_rect(Rect::new(
                Mm(*x as f32),
                pdf_y(y + height),
                Mm((x + width) as f32),
                pdf_y(*y),
            ));
        }
        DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color: rgb,
        } => {
            layer.set_outline_color(color(*rgb));
            layer.set_outline_thickness(0.5);
            let (left, right) = (Mm(*x as f32), Mm((x + width) as f32));
            let (top, bottom) = (pdf_y(*y), pdf_y(y + height));
            layer.add_line(Line {
                points: vec![
                    (Point::new(left, top), false),
                    (Point::new(right, top), false),
                    (Point::new(right, bottom), false),
                    (Point::new(left, bottom), false),
                ],
                is_closed: true,
            });
        }
    }
}

/// Paint a laid-out document into PDF bytes
pub fn paint(title: &str, layout: &DocumentLayout) -> ReportResult<Vec<u8>> {
    let width = Mm(PAGE_WIDTH as f32);
    let height = Mm(PAGE_HEIGHT as f32);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for op in &page.ops {
            paint_op(&layer, op, &regular, &bold);
        }
    }

    let mut buf = BufWriter::new(Cursor::new(Vec::new()));
    doc.save(&mut buf).map_err(pdf_error)?;
    let cursor = buf.into_inner().map_err(pdf_error)?;
    Ok(cursor.into_inner())
}
