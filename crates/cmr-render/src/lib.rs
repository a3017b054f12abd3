//! CMR form rendering
//!
//! Turns a [`ShipmentRecord`] into a printable international road
//! consignment note (CMR) PDF. The engine overlays field text onto a
//! remotely fetched form template, or onto a synthesized blank A4 page when
//! the template cannot be obtained.
//!
//! # Example
//!
//! ```ignore
//! use cmr_render::{RenderConfig, RenderEngine, ShipmentRecord};
//!
//! let engine = RenderEngine::new(RenderConfig::default());
//! let record: ShipmentRecord = serde_json::from_str(body)?;
//! let document = engine.render(&record).await?;
//! std::fs::write("cmr.pdf", document.bytes)?;
//! ```

mod assets;
mod engine;
pub mod layout;
mod model;
pub mod normalize;

pub use assets::FontStrategy;
pub use engine::{RenderConfig, RenderEngine, RenderError, RenderedDocument};
pub use model::{GoodsLine, PartyInfo, ShipmentRecord, ValidationError};
