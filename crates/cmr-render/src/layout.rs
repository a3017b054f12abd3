//! Field layout table
//!
//! Static mapping from logical field to page position. Coordinates are in
//! points with the origin at the bottom-left of an A4 page and were picked
//! against the blank CMR template; they are shared knowledge between this
//! renderer and whoever validated the template.

/// Default font size for field values
pub const FIELD_SIZE: f32 = 9.0;

/// Vertical advance between the lines of a multi-line field value
pub const LINE_PITCH: f64 = 11.0;

/// Logical fields with a fixed single position on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Box 1 - sender
    Sender,
    /// Box 2 - consignee
    Consignee,
    /// Box 3 - place of delivery
    DeliveryPlace,
    /// Box 4 - place of taking over
    PickupPlace,
    /// Box 16 - carrier
    Carrier,
    /// Box 13 - sender's instructions
    Instructions,
    /// Box 18 - carrier's reservations
    Reservations,
    /// Box 23 - signature place and date
    Signature,
}

/// A field's position on page 1
#[derive(Debug, Clone, Copy)]
pub struct FieldSlot {
    pub field: Field,
    pub x: f64,
    pub y: f64,
    pub size: f32,
}

const fn slot(field: Field, x: f64, y: f64) -> FieldSlot {
    FieldSlot {
        field,
        x,
        y,
        size: FIELD_SIZE,
    }
}

/// All scalar field positions, in form order
pub const FIELDS: &[FieldSlot] = &[
    slot(Field::Sender, 40.0, 760.0),
    slot(Field::Consignee, 40.0, 680.0),
    slot(Field::DeliveryPlace, 40.0, 620.0),
    slot(Field::PickupPlace, 40.0, 590.0),
    slot(Field::Carrier, 300.0, 760.0),
    slot(Field::Instructions, 40.0, 400.0),
    slot(Field::Reservations, 300.0, 400.0),
    slot(Field::Signature, 40.0, 100.0),
];

/// Geometry of the goods table (boxes 6-12)
#[derive(Debug, Clone, Copy)]
pub struct GoodsLayout {
    /// Y of the first row
    pub start_y: f64,
    /// Vertical distance between rows
    pub row_pitch: f64,
    /// Column X offsets
    pub marks_x: f64,
    pub nature_x: f64,
    pub packages_x: f64,
    pub weight_x: f64,
}

impl GoodsLayout {
    /// Y coordinate of row `index`
    pub fn row_y(&self, index: usize) -> f64 {
        self.start_y - index as f64 * self.row_pitch
    }

    /// Rows that fit before the table reaches `bottom_y`
    pub fn rows_above(&self, bottom_y: f64) -> usize {
        if self.start_y < bottom_y {
            return 0;
        }
        ((self.start_y - bottom_y) / self.row_pitch) as usize + 1
    }
}

/// The goods table geometry used on the form
pub const GOODS: GoodsLayout = GoodsLayout {
    start_y: 500.0,
    row_pitch: 20.0,
    marks_x: 40.0,
    nature_x: 120.0,
    packages_x: 350.0,
    weight_x: 450.0,
};

/// Column header line printed above the table on the blank-page path
pub const GOODS_HEADER: (f64, f64, f32) = (40.0, 515.0, 8.0);

/// Note printed near the bottom when no template could be loaded
pub const FALLBACK_NOTE: (f64, f64, f32) = (40.0, 32.0, 7.0);

/// Fixed provenance footer position
pub const FOOTER: (f64, f64, f32) = (40.0, 20.0, 7.0);
