//! Shipment record model
//!
//! This is the wire shape accepted by `POST /api/create-cmr`. Every field is
//! optional; a missing field is simply not printed. The HTML form sends the
//! same camelCase keys.

use serde::Deserialize;
use thiserror::Error;

/// Validation failures on an otherwise well-formed record
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("goods list has {0} rows, limit is {1}")]
    TooManyGoodsRows(usize, usize),
}

/// A party on the consignment note (sender, consignee or carrier)
///
/// Clients send either a free-text block or a structured triple; both are
/// accepted and resolved to a single printed line at ingestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PartyInfo {
    Flat(String),
    Structured {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        city: Option<String>,
    },
}

impl PartyInfo {
    /// Resolve to the single line printed on the form
    pub fn to_line(&self) -> String {
        match self {
            PartyInfo::Flat(text) => text.trim().to_string(),
            PartyInfo::Structured {
                name,
                address,
                city,
            } => [name, address, city]
                .into_iter()
                .flatten()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// One line of the goods table; order in the list is print order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoodsLine {
    #[serde(default)]
    pub marks: Option<String>,
    #[serde(default)]
    pub nature: Option<String>,
    #[serde(default)]
    pub packages: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
}

/// The complete input for one consignment note
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    #[serde(default)]
    pub sender: Option<PartyInfo>,
    #[serde(default)]
    pub consignee: Option<PartyInfo>,
    #[serde(default)]
    pub carrier: Option<PartyInfo>,

    #[serde(default)]
    pub pickup_place: Option<String>,
    #[serde(default)]
    pub delivery_place: Option<String>,

    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub reservations: Option<String>,

    #[serde(default)]
    pub sign_place: Option<String>,
    #[serde(default)]
    pub sign_date: Option<String>,

    #[serde(default)]
    pub goods: Vec<GoodsLine>,
}

impl ShipmentRecord {
    /// Check the record against the layout's hard limits
    ///
    /// The goods table has no pagination; rows past the cap would run off the
    /// page, so over-long lists are rejected up front instead of silently
    /// overlapping the fields below the table.
    pub fn validate(&self, max_goods_rows: usize) -> Result<(), ValidationError> {
        if self.goods.len() > max_goods_rows {
            return Err(ValidationError::TooManyGoodsRows(
                self.goods.len(),
                max_goods_rows,
            ));
        }
        Ok(())
    }

    /// The signature line: place and date joined, empty parts dropped
    pub fn signature_line(&self) -> String {
        [&self.sign_place, &self.sign_date]
            .into_iter()
            .flatten()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}
