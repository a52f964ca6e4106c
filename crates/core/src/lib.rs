//! Core logic for keyword highlighting: matching, scaling and the highlight pipeline.

pub mod highlight;
pub mod keywords;
pub mod scale;

pub use highlight::{find_highlights, Highlight, HighlightOptions, HighlightReport};
pub use keywords::{KeywordSet, MatchMode};
pub use scale::Scale;

use linch_ocr::{OcrOutput, OcrWord};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("ocr error: {0}")]
    Ocr(#[from] linch_ocr::OcrError),
}

/// Display size requested by the caller; `None` keeps the natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

/// Filters already-extracted words and builds the report.
pub fn highlight_words(
    words: &[OcrWord],
    natural: (u32, u32),
    display: Option<DisplaySize>,
    keywords: &KeywordSet,
    options: &HighlightOptions,
) -> Result<HighlightReport> {
    let (display_width, display_height) = match display {
        Some(size) => (size.width, size.height),
        None => (natural.0 as f32, natural.1 as f32),
    };
    let scale = Scale::between(natural, (display_width, display_height))?;
    let highlights = find_highlights(words, keywords, options, scale);

    Ok(HighlightReport {
        image_width: natural.0,
        image_height: natural.1,
        display_width,
        display_height,
        mode: options.mode,
        keywords: keywords.to_vec(),
        word_count: words.len(),
        highlights,
    })
}

/// Normalizes raw engine output, then filters and rescales.
pub fn highlight_output(
    output: &OcrOutput,
    display: Option<DisplaySize>,
    keywords: &KeywordSet,
    options: &HighlightOptions,
) -> Result<HighlightReport> {
    let words = linch_ocr::parse_output(output)?;
    highlight_words(
        &words,
        (output.image_width, output.image_height),
        display,
        keywords,
        options,
    )
}
