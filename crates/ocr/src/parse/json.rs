//! JSON 输出解析
//!
//! 支持两种形状：
//! - 结构树：`blocks → paragraphs → lines → words`
//! - 扁平列表：顶层 `words` 数组，或整个文档就是单词数组
//!
//! 允许外层包一层 `{ "data": { ... } }`。

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::types::{BBox, OcrWord};

#[derive(Debug, Default, Deserialize)]
struct JsonPage {
    blocks: Option<Vec<JsonBlock>>,
    words: Option<Vec<JsonWord>>,
}

#[derive(Debug, Deserialize)]
struct JsonBlock {
    paragraphs: Option<Vec<JsonParagraph>>,
}

#[derive(Debug, Deserialize)]
struct JsonParagraph {
    lines: Option<Vec<JsonLine>>,
}

#[derive(Debug, Deserialize)]
struct JsonLine {
    words: Option<Vec<JsonWord>>,
}

/// 单词字段保持原始 JSON，逐个转换，单个坏单词不影响整页
#[derive(Debug, Deserialize)]
struct JsonWord {
    text: Option<Value>,
    confidence: Option<Value>,
    bbox: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonBox {
    Corners {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Rect {
        #[serde(alias = "x")]
        left: f32,
        #[serde(alias = "y")]
        top: f32,
        width: f32,
        height: f32,
    },
}

impl From<JsonBox> for BBox {
    fn from(value: JsonBox) -> Self {
        match value {
            JsonBox::Corners { x0, y0, x1, y1 } => BBox::new(x0, y0, x1, y1),
            JsonBox::Rect {
                left,
                top,
                width,
                height,
            } => BBox::from_xywh(left, top, width, height),
        }
    }
}

/// 解析 JSON 输出，按文档顺序返回单词
pub fn parse_json(body: &str) -> Result<Vec<OcrWord>> {
    let mut value: Value = serde_json::from_str(body)?;

    if value.get("data").is_some_and(Value::is_object) {
        value = value["data"].take();
    }

    let page = match value {
        Value::Array(_) => JsonPage {
            blocks: None,
            words: Some(serde_json::from_value(value)?),
        },
        Value::Object(_) => serde_json::from_value(value)?,
        _ => JsonPage::default(),
    };

    let raw_words: Vec<JsonWord> = match page.blocks.filter(|b| !b.is_empty()) {
        Some(blocks) => blocks
            .into_iter()
            .flat_map(|b| b.paragraphs.unwrap_or_default())
            .flat_map(|p| p.lines.unwrap_or_default())
            .flat_map(|l| l.words.unwrap_or_default())
            .collect(),
        None => page.words.unwrap_or_default(),
    };

    Ok(raw_words.into_iter().filter_map(into_word).collect())
}

fn into_word(raw: JsonWord) -> Option<OcrWord> {
    let text = raw.text?.as_str()?.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let Some(bbox) = raw
        .bbox
        .and_then(|v| serde_json::from_value::<JsonBox>(v).ok())
        .map(BBox::from)
    else {
        log::debug!("[JSON] 单词缺少 bbox 或格式错误，跳过: {:?}", text);
        return None;
    };
    if bbox.is_degenerate() {
        log::debug!("[JSON] 单词 bbox 无效，跳过: {:?}", text);
        return None;
    }

    Some(OcrWord {
        text,
        confidence: raw.confidence.and_then(|v| v.as_f64()).map(|c| c as f32),
        bbox,
    })
}
