use linch_core::{highlight_output, DisplaySize, HighlightOptions, KeywordSet, MatchMode};
use linch_ocr::{BBox, OcrOutput, OcrOutputFormat};

const RECEIPT_HOCR: &str = r#"<html><body>
<div class='ocr_page' id='page_1' title='image "receipt.png"; bbox 0 0 800 600; ppageno 0'>
 <span class='ocr_line' id='line_1_1' title="bbox 40 40 600 80">
  <span class='ocrx_word' id='word_1_1' title='bbox 40 40 160 80; x_wconf 95'>Coffee</span>
  <span class='ocrx_word' id='word_1_2' title='bbox 180 40 260 80; x_wconf 93'>beans</span>
 </span>
 <span class='ocr_line' id='line_1_2' title="bbox 40 500 600 560">
  <span class='ocrx_word' id='word_1_3' title='bbox 40 500 200 560; x_wconf 88'>TOTAL:</span>
  <span class='ocrx_word' id='word_1_4' title='bbox 400 500 560 560; x_wconf 91'>$12.50</span>
 </span>
</div>
</body></html>"#;

fn receipt() -> OcrOutput {
    OcrOutput {
        format: OcrOutputFormat::Hocr,
        body: RECEIPT_HOCR.to_string(),
        image_width: 800,
        image_height: 600,
    }
}

#[test]
fn hocr_to_display_highlights() {
    let keywords = KeywordSet::parse("total, coffee");
    let display = Some(DisplaySize {
        width: 400.0,
        height: 300.0,
    });

    let report =
        highlight_output(&receipt(), display, &keywords, &HighlightOptions::default()).unwrap();

    assert_eq!(report.word_count, 4);
    assert_eq!(report.keywords, vec!["total", "coffee"]);
    assert_eq!(report.highlights.len(), 2);

    let coffee = &report.highlights[0];
    assert_eq!(coffee.keyword, "coffee");
    assert_eq!(coffee.source, BBox::new(40.0, 40.0, 160.0, 80.0));
    assert_eq!(coffee.bbox, BBox::new(20.0, 20.0, 80.0, 40.0));

    let total = &report.highlights[1];
    assert_eq!(total.text, "TOTAL:");
    assert_eq!(total.bbox, BBox::new(20.0, 250.0, 100.0, 280.0));
}

#[test]
fn natural_size_when_no_display() {
    let keywords = KeywordSet::parse("beans");
    let options = HighlightOptions {
        mode: MatchMode::Exact,
        min_confidence: None,
    };
    let report = highlight_output(&receipt(), None, &keywords, &options).unwrap();

    assert_eq!((report.display_width, report.display_height), (800.0, 600.0));
    assert_eq!(report.highlights.len(), 1);
    assert_eq!(report.highlights[0].bbox, report.highlights[0].source);
}

#[test]
fn report_serializes_camel_case() {
    let report = highlight_output(
        &receipt(),
        None,
        &KeywordSet::parse("total"),
        &HighlightOptions::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["imageWidth"], 800);
    assert_eq!(json["mode"], "substring");
    assert_eq!(json["highlights"][0]["bbox"]["x0"], 40.0);
}

#[test]
fn zero_sized_image_is_rejected() {
    let mut output = receipt();
    output.image_width = 0;
    assert!(highlight_output(&output, None, &KeywordSet::parse("total"), &HighlightOptions::default()).is_err());
}
