//! Form rendering engine
//!
//! Orchestrates the collaborators: resolves background and font (concurrent,
//! both with fallback), normalizes field values for the active font, walks
//! the field layout table and the goods list, and serializes the result.

use crate::assets::{AssetFetcher, FontStrategy};
use crate::layout::{self, Field, FIELDS, GOODS};
use crate::model::{ShipmentRecord, ValidationError};
use crate::normalize::{fold_and_upper, upper_only};
use pdf_overlay::{Color, PdfError};
use std::time::Duration;
use thiserror::Error;

/// Header line printed above the goods table on the blank-page path
const GOODS_HEADER_TEXT: &str = "MARKS | NATURE | PACKAGES | WEIGHT";

/// Note printed when the form was rendered without a template
const FALLBACK_NOTE_TEXT: &str = "No form template was available - rendered on a blank page.";

/// Fixed provenance footer, printed on every document
const FOOTER_TEXT: &str = "This document was generated digitally.";

/// Errors that abort a render
///
/// Everything else (template or font trouble) degrades inside the asset
/// layer and never reaches the caller.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid shipment record: {0}")]
    Validation(#[from] ValidationError),

    #[error("pdf error: {0}")]
    Pdf(#[from] PdfError),
}

/// Immutable engine configuration, built once at process start
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Background template PDF location
    pub template_url: String,
    /// Text-rendering strategy
    pub font_strategy: FontStrategy,
    /// Bound on each outbound asset fetch
    pub fetch_timeout: Duration,
    /// Goods rows accepted before the request is rejected
    pub max_goods_rows: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_url:
                "https://raw.githubusercontent.com/goktugy/cmr-template/main/cmr-blank.pdf"
                    .to_string(),
            font_strategy: FontStrategy::Standard,
            fetch_timeout: Duration::from_secs(5),
            max_goods_rows: 20,
        }
    }
}

/// The finished output of one render call
pub struct RenderedDocument {
    /// Complete PDF bytes
    pub bytes: Vec<u8>,
    /// Page count of the document (>= 1)
    pub page_count: usize,
}

/// Renders shipment records into CMR documents
pub struct RenderEngine {
    config: RenderConfig,
    assets: AssetFetcher,
}

impl RenderEngine {
    pub fn new(config: RenderConfig) -> Self {
        let assets = AssetFetcher::new(config.fetch_timeout);
        Self { config, assets }
    }

    /// Render one consignment note
    ///
    /// Fields absent from the record are skipped, never printed as blanks.
    /// All text lands on page 1; row `i` of the goods table sits at exactly
    /// `start_y - i * row_pitch`.
    pub async fn render(&self, record: &ShipmentRecord) -> Result<RenderedDocument, RenderError> {
        record.validate(self.config.max_goods_rows)?;

        // The two asset fetches are independent; issue them concurrently.
        let (background, font) = tokio::join!(
            self.assets.resolve_background(&self.config.template_url),
            self.assets.resolve_font(&self.config.font_strategy),
        );

        let fallback = background.is_fallback();
        let mut doc = background.into_document();

        let clean: fn(&str) -> String = if font.is_embedded() {
            upper_only
        } else {
            fold_and_upper
        };
        doc.use_font(font);

        // Scalar fields at their fixed positions. The free-text blocks come
        // from textareas, so each line of a value gets its own text run,
        // stepping down from the field's anchor.
        for slot in FIELDS {
            let Some(value) = field_value(record, slot.field) else {
                continue;
            };
            for (line_no, line) in value.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let y = slot.y - line_no as f64 * layout::LINE_PITCH;
                doc.draw_text(1, &clean(line), slot.x, y, slot.size, Color::black())?;
            }
        }

        // Goods table, one row per line in list order
        for (index, line) in record.goods.iter().enumerate() {
            let row_y = GOODS.row_y(index);
            let columns = [
                (&line.marks, GOODS.marks_x),
                (&line.nature, GOODS.nature_x),
                (&line.packages, GOODS.packages_x),
                (&line.weight, GOODS.weight_x),
            ];
            for (value, x) in columns {
                let Some(value) = value.as_deref().map(str::trim) else {
                    continue;
                };
                if value.is_empty() {
                    continue;
                }
                doc.draw_text(1, &clean(value), x, row_y, layout::FIELD_SIZE, Color::black())?;
            }
        }

        // On the blank page the boxes are missing, so label the table and
        // note why no template shows through.
        if fallback {
            let (x, y, size) = layout::GOODS_HEADER;
            doc.draw_text(1, GOODS_HEADER_TEXT, x, y, size, Color::black())?;

            let (x, y, size) = layout::FALLBACK_NOTE;
            doc.draw_text(1, FALLBACK_NOTE_TEXT, x, y, size, Color::gray())?;
        }

        let (x, y, size) = layout::FOOTER;
        doc.draw_text(1, FOOTER_TEXT, x, y, size, Color::gray())?;

        let page_count = doc.page_count();
        let bytes = doc.to_bytes()?;

        Ok(RenderedDocument { bytes, page_count })
    }
}

/// Resolve a logical field to its printable value, if present
fn field_value(record: &ShipmentRecord, field: Field) -> Option<String> {
    match field {
        Field::Sender => record.sender.as_ref().map(|p| p.to_line()),
        Field::Consignee => record.consignee.as_ref().map(|p| p.to_line()),
        Field::Carrier => record.carrier.as_ref().map(|p| p.to_line()),
        Field::DeliveryPlace => record.delivery_place.clone(),
        Field::PickupPlace => record.pickup_place.clone(),
        Field::Instructions => record.instructions.clone(),
        Field::Reservations => record.reservations.clone(),
        Field::Signature => Some(record.signature_line()),
    }
}
