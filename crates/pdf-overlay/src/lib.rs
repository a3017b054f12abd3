//! PDF Overlay - writing form text onto an existing or blank PDF
//!
//! This crate provides functionality for:
//! - Opening a PDF document from bytes (a downloaded form template)
//! - Synthesizing a blank single-page A4 document
//! - Placing text at absolute page coordinates (points, origin bottom-left)
//! - Rendering with a built-in base-14 font or an embedded TrueType font
//!
//! # Example
//!
//! ```ignore
//! use pdf_overlay::{Color, FormDocument, PageFont, StandardFont};
//!
//! let mut doc = FormDocument::blank_a4();
//! doc.use_font(PageFont::Standard(StandardFont::helvetica()));
//! doc.draw_text(1, "HELLO", 40.0, 760.0, 9.0, Color::black())?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, FormDocument};
pub use font::{EmbeddedFont, PageFont, StandardFont};

use thiserror::Error;

/// A4 page width in points
pub const A4_WIDTH: f64 = 595.28;
/// A4 page height in points
pub const A4_HEIGHT: f64 = 841.89;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Failed to serialize PDF: {0}")]
    SaveError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Font subset error: {0}")]
    FontSubsetError(String),

    #[error("No font selected for document")]
    FontNotSet,

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
