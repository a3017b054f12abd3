//! Font handling for the overlay renderer
//!
//! Two kinds of fonts are supported. `StandardFont` is one of the base-14
//! fonts every PDF reader ships; it needs no embedded data but only covers
//! the WinAnsi (Latin-1) range. `EmbeddedFont` wraps a TrueType face that is
//! subsetted and embedded into the document, which makes the full source
//! alphabet available.

use crate::text::encode_literal;
use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::HashSet;

/// The font used for all text placed on a form
pub enum PageFont {
    /// Built-in base-14 font, WinAnsi encoded literal strings
    Standard(StandardFont),
    /// Embedded TrueType font, Identity-H encoded hex strings
    Embedded(EmbeddedFont),
}

impl PageFont {
    /// Whether this font carries its own glyph data
    pub fn is_embedded(&self) -> bool {
        matches!(self, PageFont::Embedded(_))
    }

    /// Encode text as a content-stream string operand, tracking used
    /// characters on the embedded path so the subset stays complete.
    pub(crate) fn encode_text(&mut self, text: &str) -> Result<Vec<u8>> {
        match self {
            PageFont::Standard(_) => Ok(encode_literal(text)),
            PageFont::Embedded(font) => {
                font.note_chars(text);
                Ok(font.encode_text_hex(text)?.into_bytes())
            }
        }
    }
}

/// A base-14 font referenced by name only
pub struct StandardFont {
    base_font: &'static str,
}

impl StandardFont {
    /// Helvetica, the font the CMR form is conventionally filled with
    pub fn helvetica() -> Self {
        Self {
            base_font: "Helvetica",
        }
    }

    /// Build the Type1 font dictionary for page resources
    pub(crate) fn font_dict(&self) -> Dictionary {
        Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type1".into()),
            ("BaseFont", Object::Name(self.base_font.into())),
            ("Encoding", "WinAnsiEncoding".into()),
        ])
    }
}

/// PDF objects generated when embedding a TrueType font
pub(crate) struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (subsetted TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

/// An embedded TrueType font with glyph usage tracking for subsetting
///
/// The raw font bytes are owned; the zero-copy `ttf_parser::Face` view is
/// rebuilt from them where needed, which keeps the struct free of
/// self-references (and of leaked buffers in a long-lived server).
pub struct EmbeddedFont {
    /// Font name/identifier
    name: String,
    /// Raw TTF data
    ttf_data: Vec<u8>,
    /// Characters used (for subsetting)
    used_chars: HashSet<char>,
}

impl EmbeddedFont {
    /// Parse font data into an embeddable font
    ///
    /// # Arguments
    /// * `name` - Font identifier used as the PDF BaseFont name
    /// * `ttf_data` - TrueType font file bytes
    pub fn parse(name: &str, ttf_data: Vec<u8>) -> Result<Self> {
        // Validate up front so later face() calls cannot surprise
        ttf_parser::Face::parse(&ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data,
            used_chars: HashSet::new(),
        })
    }

    /// Borrow a parsed view of the font data
    fn face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))
    }

    /// Record characters as used, so their glyphs survive subsetting
    pub fn note_chars(&mut self, text: &str) {
        for c in text.chars() {
            self.used_chars.insert(c);
        }
    }

    /// Get glyph ID for a character (0 = .notdef)
    pub fn glyph_id(&self, c: char) -> u16 {
        self.face()
            .ok()
            .and_then(|face| face.glyph_index(c))
            .map(|id| id.0)
            .unwrap_or(0)
    }

    /// Check whether the face has a real glyph for the character
    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph_id(c) != 0
    }

    /// Encode text as a hex string for the Tj operator (Identity-H)
    pub fn encode_text_hex(&self, text: &str) -> Result<String> {
        let face = self.face()?;
        let mut result = String::new();
        for c in text.chars() {
            let gid = face.glyph_index(c).map(|id| id.0).unwrap_or(0);
            result.push_str(&format!("{gid:04X}"));
        }
        Ok(format!("<{result}>"))
    }

    /// Subset the font to the used glyphs
    ///
    /// Uses the PDF profile, which keeps glyph IDs stable, so text encoded
    /// before subsetting stays valid.
    fn subset_data(&self) -> Result<Vec<u8>> {
        let mut gids: Vec<u16> = self.used_chars.iter().map(|&c| self.glyph_id(c)).collect();
        gids.push(0);
        gids.sort();
        gids.dedup();

        subsetter::subset(&self.ttf_data, 0, subsetter::Profile::pdf(&gids))
            .map_err(|e| PdfError::FontSubsetError(e.to_string()))
    }

    /// Generate all PDF objects needed to embed this font
    pub(crate) fn to_pdf_objects(&self) -> Result<FontObjects> {
        let face = self.face()?;
        let font_name = Object::Name(self.name.clone().into());
        let subset = self.subset_data()?;

        // ToUnicode CMap
        let tounicode_content = self.generate_tounicode_cmap(&face);
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", "CMap".into()),
                ("Length", (tounicode_content.len() as i32).into()),
            ]),
            tounicode_content.into_bytes(),
        );

        // Font file stream
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![("Length1", (subset.len() as i32).into())]),
            subset,
        );

        // Font descriptor
        let units_per_em = face.units_per_em() as i32;
        let ascender = face.ascender();
        let descender = face.descender();

        let font_bbox = vec![
            0.into(),
            descender.into(),
            units_per_em.into(),
            ascender.into(),
        ];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()), // Symbolic font
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascender.into()),
            ("Descent", descender.into()),
            ("CapHeight", ascender.into()),
            ("StemV", 80.into()),
        ]);

        // CIDFont Type2 dictionary
        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("W", self.generate_widths_array(&face).into()),
            ("DW", 1000.into()),
        ]);

        // Type0 font dictionary
        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate the /W array for glyph widths
    fn generate_widths_array(&self, face: &ttf_parser::Face<'_>) -> Vec<Object> {
        let mut gids: Vec<u16> = self.used_chars.iter().map(|&c| self.glyph_id(c)).collect();
        gids.sort();
        gids.dedup();

        // Individual mapping format: [gid1 [width1] gid2 [width2] ...].
        // Less compact than ranges but correct for any GID distribution.
        let mut widths = Vec::new();
        for gid in gids {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .unwrap_or(1000);
            widths.push(gid.into());
            widths.push(vec![advance.into()].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self, face: &ttf_parser::Face<'_>) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mut char_list: Vec<char> = self.used_chars.iter().copied().collect();
        char_list.sort_by_key(|c| *c as u32);

        if !char_list.is_empty() {
            // PDF spec recommends limiting bfchar sections to 100 entries
            for chunk in char_list.chunks(100) {
                cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
                for c in chunk {
                    let gid = face.glyph_index(*c).map(|id| id.0).unwrap_or(0);
                    let unicode = *c as u32;
                    cmap.push_str(&format!("<{gid:04X}> <{unicode:04X}>\n"));
                }
                cmap.push_str("endbfchar\n");
            }
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}
