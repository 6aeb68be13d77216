//! One-page PDF report.
//!
//! Layout in PDF points on a US-letter page, origin bottom-left:
//!
//! ```text
//! (50, 750)  Plant Disease: <label>
//! (50, 730)  Treatment Type: <kind>
//! (50, 710)  Recommendation:
//! (60, 690)  <advice line 1>
//! (60, 670)  <advice line 2> ...
//! (50, y-10) Product URL: <url>
//! ```

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use tracing::debug;

use super::validate_url;
use crate::domain::TreatmentKind;
use crate::error::{Error, Result};

/// Page width in points (US letter).
pub const PAGE_WIDTH_PT: f32 = 612.0;
/// Page height in points (US letter).
pub const PAGE_HEIGHT_PT: f32 = 792.0;
/// Font size in points.
pub const FONT_SIZE_PT: f32 = 14.0;
/// Vertical distance between advice lines.
pub const LINE_SPACING_PT: f32 = 20.0;

const MARGIN_X: f32 = 50.0;
const ADVICE_X: f32 = 60.0;
const ADVICE_TOP: f32 = 690.0;
const URL_GAP: f32 = 10.0;

/// A single line of text positioned on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Distance from the left edge in points.
    pub x: f32,
    /// Baseline distance from the bottom edge in points.
    pub y: f32,
    /// Text as drawn.
    pub text: String,
}

/// The full, fixed page layout of a report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportLayout {
    /// Lines in drawing order, top to bottom.
    pub lines: Vec<TextLine>,
}

impl ReportLayout {
    fn push(&mut self, x: f32, y: f32, text: impl AsRef<str>) {
        self.lines.push(TextLine {
            x,
            y,
            text: printable(text.as_ref()),
        });
    }
}

/// Computes where each line of the report goes.
///
/// Advice text is split on `\n`; every segment becomes one line.
#[must_use]
pub fn layout_report(label: &str, kind: TreatmentKind, text: &str, url: &str) -> ReportLayout {
    let mut layout = ReportLayout::default();
    layout.push(MARGIN_X, 750.0, format!("Plant Disease: {label}"));
    layout.push(MARGIN_X, 730.0, format!("Treatment Type: {kind}"));
    layout.push(MARGIN_X, 710.0, "Recommendation:");

    let mut y = ADVICE_TOP;
    for line in text.split('\n') {
        layout.push(ADVICE_X, y, line);
        y -= LINE_SPACING_PT;
    }

    layout.push(MARGIN_X, y - URL_GAP, format!("Product URL: {url}"));
    layout
}

/// Renders the report as PDF bytes.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` if `url` is not a valid product link and
/// `Error::Report` if the document cannot be built.
pub fn render_report(label: &str, kind: TreatmentKind, text: &str, url: &str) -> Result<Vec<u8>> {
    validate_url(url)?;
    let layout = layout_report(label, kind, text, url);

    let (doc, page, layer) = PdfDocument::new(
        format!("Plant Disease Report: {label}"),
        Mm::from(Pt(PAGE_WIDTH_PT)),
        Mm::from(Pt(PAGE_HEIGHT_PT)),
        "Report",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Report(e.to_string()))?;
    let canvas = doc.get_page(page).get_layer(layer);

    for line in &layout.lines {
        canvas.use_text(
            line.text.clone(),
            FONT_SIZE_PT,
            Mm::from(Pt(line.x)),
            Mm::from(Pt(line.y)),
            &font,
        );
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| Error::Report(e.to_string()))?;
    debug!(
        "Rendered {} line report for {label} ({} bytes)",
        layout.lines.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Reduces text to what the built-in Helvetica font can draw.
///
/// Drops markdown emphasis and anything outside Latin-1 (emoji), then
/// trims the whitespace left behind.
fn printable(text: &str) -> String {
    let cleaned: String = text
        .replace("**", "")
        .chars()
        .filter(|c| u32::from(*c) < 0x100 && !c.is_control())
        .collect();
    cleaned.trim().to_string()
}
