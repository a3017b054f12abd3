//! Form document wrapper

use crate::font::PageFont;
use crate::text::generate_text_operators;
use crate::{PdfError, Result, A4_HEIGHT, A4_WIDTH};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Font resource name used on every page that receives text
const FONT_RESOURCE: &str = "F1";

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Gray color (used for the provenance footer)
    pub fn gray() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF document being filled with form text
///
/// Text operators are buffered per page and flushed into the content streams
/// during serialization, after the font has been registered (and, for
/// embedded fonts, subsetted to the characters actually used).
pub struct FormDocument {
    /// The underlying lopdf document
    inner: Document,
    /// The single font all text is drawn with
    font: Option<PageFont>,
    /// Buffered content operators per page (page number -> operators)
    page_content: HashMap<usize, Vec<u8>>,
}

impl FormDocument {
    /// Synthesize a blank single-page A4 document (595.28 x 841.89 points)
    pub fn blank_a4() -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();

        let contents_id = inner.add_object(Object::Stream(Stream::new(dictionary! {}, vec![])));

        let page_id = inner.add_object(Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(A4_WIDTH as f32),
                Object::Real(A4_HEIGHT as f32),
            ],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        }));

        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 1,
                "Kids" => vec![page_id.into()],
            }),
        );

        let catalog_id = inner.add_object(Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }));
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            font: None,
            page_content: HashMap::new(),
        }
    }

    /// Open a PDF document from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::ParseError(e.to_string()))?;

        if inner.get_pages().is_empty() {
            return Err(PdfError::ParseError("document has no pages".to_string()));
        }

        Ok(Self {
            inner,
            font: None,
            page_content: HashMap::new(),
        })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Select the font for all subsequent text
    pub fn use_font(&mut self, font: PageFont) {
        self.font = Some(font);
    }

    /// Place text at a page position
    ///
    /// Coordinates are in points with the origin at the bottom-left corner of
    /// the page, matching the field layout table. Empty text is a no-op.
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `text` - Text to place
    /// * `x` - X coordinate in points (from left)
    /// * `y` - Y coordinate in points (from bottom)
    /// * `size` - Font size in points
    /// * `color` - Text color
    pub fn draw_text(
        &mut self,
        page: usize,
        text: &str,
        x: f64,
        y: f64,
        size: f32,
        color: Color,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        if text.is_empty() {
            return Ok(());
        }

        let font = self.font.as_mut().ok_or(PdfError::FontNotSet)?;
        let encoded = font.encode_text(text)?;

        let ops = generate_text_operators(&encoded, FONT_RESOURCE, x, y, size, color);
        self.page_content.entry(page).or_default().extend(ops);

        Ok(())
    }

    /// Serialize the document to bytes
    ///
    /// Embeds the font, flushes all buffered text into the page content
    /// streams and writes the final PDF.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        if !self.page_content.is_empty() {
            let font_id = self.embed_font_object()?;

            let mut buffers: Vec<(usize, Vec<u8>)> = self.page_content.drain().collect();
            buffers.sort_by_key(|(page, _)| *page);

            for (page, content) in buffers {
                self.append_to_content_stream(page, &content)?;
                self.add_font_to_page_resources(page, font_id)?;
            }
        }

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Extract the (width, height) of a page from its MediaBox
    ///
    /// Follows the Parent chain for inherited MediaBox entries; falls back to
    /// A4 when no MediaBox can be found.
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let media_box = self.inherited_media_box(page_id)?;
        if media_box.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }

        let coord = |obj: &Object| -> Result<f64> {
            obj.as_f32()
                .map(|v| v as f64)
                .ok()
                .or_else(|| obj.as_i64().ok().map(|v| v as f64))
                .ok_or_else(|| PdfError::ParseError("Invalid MediaBox coordinate".to_string()))
        };

        let width = coord(&media_box[2])? - coord(&media_box[0])?;
        let height = coord(&media_box[3])? - coord(&media_box[1])?;
        Ok((width, height))
    }

    /// Get MediaBox, following the parent inheritance chain if needed
    fn inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        // Safety limit on the parent chain depth
        for _ in 0..10 {
            let obj = self.inner.get_object(current_id)?;
            let dict = obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let media_box_array = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(ref_id) => self
                        .inner
                        .get_object(*ref_id)?
                        .as_array()
                        .map_err(|_| {
                            PdfError::ParseError("MediaBox reference is not an array".to_string())
                        })?
                        .clone(),
                    _ => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
                };
                return Ok(media_box_array);
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current_id = *parent_id;
                continue;
            }

            break;
        }

        Ok(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(A4_WIDTH as f32),
            Object::Real(A4_HEIGHT as f32),
        ])
    }

    /// Add the selected font to the document, returning its object id
    fn embed_font_object(&mut self) -> Result<ObjectId> {
        let font = self.font.as_ref().ok_or(PdfError::FontNotSet)?;

        match font {
            PageFont::Standard(standard) => Ok(self.inner.add_object(standard.font_dict())),
            PageFont::Embedded(embedded) => {
                let objects = embedded.to_pdf_objects()?;

                let font_file_id = self.inner.add_object(objects.font_file_stream);

                let mut font_descriptor = objects.font_descriptor;
                font_descriptor.set("FontFile2", Object::Reference(font_file_id));
                let font_descriptor_id = self.inner.add_object(font_descriptor);

                let mut cid_font = objects.cid_font;
                cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
                let cid_font_id = self.inner.add_object(cid_font);

                let tounicode_id = self.inner.add_object(objects.tounicode_stream);

                let mut type0_font = objects.type0_font;
                type0_font.set(
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(cid_font_id)]),
                );
                type0_font.set("ToUnicode", Object::Reference(tounicode_id));

                Ok(self.inner.add_object(type0_font))
            }
        }
    }

    /// Append operators to a page's content stream
    ///
    /// Handles single streams, referenced streams and stream arrays, including
    /// compressed ones.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let (existing_content, page_dict_clone) = {
            let page_obj = self.inner.get_object(page_id)?;
            let page_dict = page_obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;

            let existing_content = match page_dict.get(b"Contents") {
                Ok(Object::Stream(stream)) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                Ok(Object::Reference(ref_id)) => {
                    if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                        stream
                            .decompressed_content()
                            .unwrap_or_else(|_| stream.content.clone())
                    } else {
                        Vec::new()
                    }
                }
                Ok(Object::Array(arr)) => {
                    let mut combined = Vec::new();
                    for obj in arr {
                        let stream = match obj {
                            Object::Reference(ref_id) => {
                                match self.inner.get_object(*ref_id) {
                                    Ok(Object::Stream(stream)) => Some(stream),
                                    _ => None,
                                }
                            }
                            Object::Stream(stream) => Some(stream),
                            _ => None,
                        };
                        if let Some(stream) = stream {
                            let data = stream
                                .decompressed_content()
                                .unwrap_or_else(|_| stream.content.clone());
                            combined.extend_from_slice(&data);
                            combined.push(b'\n');
                        }
                    }
                    combined
                }
                _ => Vec::new(),
            };

            (existing_content, page_dict.clone())
        };

        let mut new_content = existing_content;
        new_content.extend_from_slice(content);

        let new_stream = Stream::new(Dictionary::new(), new_content);
        let stream_id = self.inner.add_object(new_stream);

        let mut new_page_dict = page_dict_clone;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Register the font reference in a page's Resources dictionary
    fn add_font_to_page_resources(&mut self, page: usize, font_id: ObjectId) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let page_obj = self.inner.get_object(page_id)?;
        let page_dict = page_obj
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?;

        let mut resources_dict = match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                _ => Dictionary::new(),
            },
            _ => Dictionary::new(),
        };

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };
        font_dict.set(FONT_RESOURCE.as_bytes(), Object::Reference(font_id));

        resources_dict.set(b"Font", Object::Dictionary(font_dict));

        let mut new_page_dict = page_dict.clone();
        new_page_dict.set(b"Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;

    #[test]
    fn test_blank_a4_dimensions() {
        let doc = FormDocument::blank_a4();
        assert_eq!(doc.page_count(), 1);

        // MediaBox values round-trip through f32, so compare with a tolerance
        let (width, height) = doc.page_size(1).unwrap();
        assert!((width - A4_WIDTH).abs() < 0.01);
        assert!((height - A4_HEIGHT).abs() < 0.01);
    }

    #[test]
    fn test_draw_text_requires_font() {
        let mut doc = FormDocument::blank_a4();
        let result = doc.draw_text(1, "x", 40.0, 760.0, 9.0, Color::black());
        assert!(matches!(result, Err(PdfError::FontNotSet)));
    }

    #[test]
    fn test_draw_text_invalid_page() {
        let mut doc = FormDocument::blank_a4();
        doc.use_font(PageFont::Standard(StandardFont::helvetica()));
        let result = doc.draw_text(2, "x", 40.0, 760.0, 9.0, Color::black());
        assert!(matches!(result, Err(PdfError::InvalidPage(2, 1))));
    }

    #[test]
    fn test_draw_empty_text_is_noop() {
        let mut doc = FormDocument::blank_a4();
        doc.use_font(PageFont::Standard(StandardFont::helvetica()));
        doc.draw_text(1, "", 40.0, 760.0, 9.0, Color::black()).unwrap();
        assert!(doc.page_content.is_empty());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = FormDocument::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::ParseError(_))));
    }
}
