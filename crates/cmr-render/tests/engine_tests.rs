//! Integration tests for the form rendering engine
//!
//! Remote asset hosts are simulated with httpmock; produced documents are
//! re-parsed with lopdf and their page-1 content streams inspected. The
//! standard-font path writes literal strings, so normalized field text can be
//! asserted directly.

use cmr_render::{FontStrategy, GoodsLine, RenderConfig, RenderEngine, RenderError, ShipmentRecord};
use httpmock::prelude::*;
use lopdf::dictionary;
use std::time::Duration;

/// Build a minimal valid single-page A4 PDF to serve as a template
fn template_pdf() -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
        dictionary! {},
        b"% template marker\n".to_vec(),
    )));
    let page_id = doc.add_object(lopdf::Object::Dictionary(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
        "Resources" => dictionary! {},
        "Contents" => contents_id,
    }));
    doc.objects.insert(
        pages_id,
        lopdf::Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![page_id.into()],
        }),
    );
    let catalog_id = doc.add_object(lopdf::Object::Dictionary(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn page_one_content(pdf_bytes: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(pdf_bytes).expect("output must be a valid PDF");
    let pages = doc.get_pages();
    let content = doc.get_page_content(pages[&1]).unwrap();
    String::from_utf8_lossy(&content).to_string()
}

fn page_one_size(pdf_bytes: &[u8]) -> (f64, f64) {
    let doc = pdf_overlay::FormDocument::from_bytes(pdf_bytes).unwrap();
    doc.page_size(1).unwrap()
}

fn engine_with(template_url: String, font_strategy: FontStrategy) -> RenderEngine {
    RenderEngine::new(RenderConfig {
        template_url,
        font_strategy,
        fetch_timeout: Duration::from_secs(2),
        max_goods_rows: 20,
    })
}

fn sample_record() -> ShipmentRecord {
    serde_json::from_str(
        r#"{
            "sender": "Örnek İhracat Ltd.",
            "goods": [{"marks": "1", "nature": "Test Yükü", "weight": "100"}]
        }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn render_with_template() {
    let server = MockServer::start();
    let template_mock = server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200)
            .header("Content-Type", "application/pdf")
            .body(template_pdf());
    });

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&sample_record()).await.unwrap();

    template_mock.assert();
    assert_eq!(doc.page_count, 1);

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("% template marker"));
    assert!(content.contains("(ORNEK IHRACAT LTD.) Tj"));
    // No fallback note when the template loaded
    assert!(!content.contains("blank page"));
}

#[tokio::test]
async fn template_http_failure_falls_back_to_blank_a4() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(404);
    });

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&sample_record()).await.unwrap();

    assert_eq!(doc.page_count, 1);
    let (width, height) = page_one_size(&doc.bytes);
    assert!((width - 595.28).abs() < 0.01);
    assert!((height - 841.89).abs() < 0.01);

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(ORNEK IHRACAT LTD.) Tj"));
    assert!(content.contains("MARKS | NATURE | PACKAGES | WEIGHT"));
    assert!(content.contains("blank page"));
}

#[tokio::test]
async fn corrupt_template_bytes_fall_back_to_blank_a4() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(b"definitely not a pdf".to_vec());
    });

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&sample_record()).await.unwrap();

    assert_eq!(doc.page_count, 1);
    assert!(page_one_content(&doc.bytes).contains("blank page"));
}

#[tokio::test]
async fn unreachable_template_host_falls_back() {
    // Nothing listens on this address; the bounded fetch fails fast
    let engine = engine_with(
        "http://127.0.0.1:1/cmr-blank.pdf".to_string(),
        FontStrategy::Standard,
    );
    let doc = engine.render(&ShipmentRecord::default()).await.unwrap();

    assert_eq!(doc.page_count, 1);
    let (width, height) = page_one_size(&doc.bytes);
    assert!((width - 595.28).abs() < 0.01);
    assert!((height - 841.89).abs() < 0.01);
}

#[tokio::test]
async fn empty_record_renders_footer_only() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&ShipmentRecord::default()).await.unwrap();

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(This document was generated digitally.) Tj"));
    // Exactly one text run: the footer
    assert_eq!(content.matches(" Tj").count(), 1);
}

#[tokio::test]
async fn goods_rows_descend_by_row_pitch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });

    let record = ShipmentRecord {
        goods: vec![
            GoodsLine {
                nature: Some("First".to_string()),
                ..Default::default()
            },
            GoodsLine {
                nature: Some("Second".to_string()),
                ..Default::default()
            },
            GoodsLine {
                nature: Some("Third".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&record).await.unwrap();

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("120 500 Td"));
    assert!(content.contains("120 480 Td"));
    assert!(content.contains("120 460 Td"));
    assert!(content.contains("(FIRST) Tj"));
    assert!(content.contains("(THIRD) Tj"));
}

#[tokio::test]
async fn single_goods_row_renders_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&sample_record()).await.unwrap();

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(TEST YUKU) Tj"));
    assert!(content.contains("120 500 Td"));
    assert!(!content.contains("120 480 Td"));
}

#[tokio::test]
async fn over_cap_goods_list_is_rejected() {
    let record = ShipmentRecord {
        goods: vec![GoodsLine::default(); 21],
        ..Default::default()
    };

    let engine = engine_with(
        "http://127.0.0.1:1/cmr-blank.pdf".to_string(),
        FontStrategy::Standard,
    );
    let result = engine.render(&record).await;

    assert!(matches!(result, Err(RenderError::Validation(_))));
}

#[tokio::test]
async fn multiline_textarea_values_step_down_per_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });

    let record: ShipmentRecord = serde_json::from_str(
        r#"{"sender": "Acme GmbH\nHauptstr. 1\nBerlin"}"#,
    )
    .unwrap();

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&record).await.unwrap();

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(ACME GMBH) Tj"));
    assert!(content.contains("40 760 Td"));
    assert!(content.contains("(HAUPTSTR. 1) Tj"));
    assert!(content.contains("40 749 Td"));
    assert!(content.contains("(BERLIN) Tj"));
    assert!(content.contains("40 738 Td"));
    // Line breaks never leak into a literal string as a replacement char
    assert!(!content.contains('?'));
}

#[tokio::test]
async fn embedded_font_renders_hex_strings() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });
    server.mock(|when, then| {
        when.method(GET).path("/form-font.ttf");
        then.status(200)
            .body(std::fs::read("../../fonts/DejaVuSansMono.ttf").unwrap());
    });

    let engine = engine_with(
        server.url("/cmr-blank.pdf"),
        FontStrategy::Embedded {
            url: server.url("/form-font.ttf"),
        },
    );
    let doc = engine.render(&sample_record()).await.unwrap();

    // Diacritics survive: no folded literal text, hex strings instead
    let content = page_one_content(&doc.bytes);
    assert!(!content.contains("(ORNEK"));
    assert!(content.contains("> Tj"));

    let reparsed = lopdf::Document::load_mem(&doc.bytes).unwrap();
    let pages = reparsed.get_pages();
    let fonts = reparsed.get_page_fonts(pages[&1]);
    let font_dict = fonts.values().next().unwrap();
    assert_eq!(font_dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
    assert_eq!(
        font_dict.get(b"BaseFont").unwrap().as_name().unwrap(),
        b"CmrForm"
    );
}

#[tokio::test]
async fn embedded_font_failure_degrades_to_standard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });
    server.mock(|when, then| {
        when.method(GET).path("/form-font.ttf");
        then.status(503);
    });

    let engine = engine_with(
        server.url("/cmr-blank.pdf"),
        FontStrategy::Embedded {
            url: server.url("/form-font.ttf"),
        },
    );
    let doc = engine.render(&sample_record()).await.unwrap();

    // Literal-string text proves the standard font took over
    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(ORNEK IHRACAT LTD.) Tj"));
}

#[tokio::test]
async fn corrupt_font_bytes_degrade_to_standard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });
    server.mock(|when, then| {
        when.method(GET).path("/form-font.ttf");
        then.status(200).body(vec![0u8; 128]);
    });

    let engine = engine_with(
        server.url("/cmr-blank.pdf"),
        FontStrategy::Embedded {
            url: server.url("/form-font.ttf"),
        },
    );
    let doc = engine.render(&sample_record()).await.unwrap();

    assert!(page_one_content(&doc.bytes).contains("(ORNEK IHRACAT LTD.) Tj"));
}

#[tokio::test]
async fn structured_parties_print_as_one_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cmr-blank.pdf");
        then.status(200).body(template_pdf());
    });

    let record: ShipmentRecord = serde_json::from_str(
        r#"{
            "consignee": {"name": "Acme GmbH", "address": "Hauptstr. 1", "city": "Berlin"},
            "signPlace": "Istanbul",
            "signDate": "2024-03-01"
        }"#,
    )
    .unwrap();

    let engine = engine_with(server.url("/cmr-blank.pdf"), FontStrategy::Standard);
    let doc = engine.render(&record).await.unwrap();

    let content = page_one_content(&doc.bytes);
    assert!(content.contains("(ACME GMBH, HAUPTSTR. 1, BERLIN) Tj"));
    assert!(content.contains("40 680 Td"));
    assert!(content.contains("(ISTANBUL - 2024-03-01) Tj"));
    assert!(content.contains("40 100 Td"));
}
