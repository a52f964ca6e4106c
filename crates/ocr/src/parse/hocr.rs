//! hOCR 解析
//!
//! 提取所有 class 含 `ocrx_word` 的元素：
//! - 文本：去掉内部标签并解码 HTML 实体
//! - bbox：title 属性中的 `bbox x0 y0 x1 y1`
//! - 置信度：title 属性中的 `x_wconf N`（可选）

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::types::{BBox, OcrWord};

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(/?)([a-z][a-z0-9]*)\b([^>]*)>").expect("tag pattern")
});

static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern")
});

const WORD_CLASS: &str = "ocrx_word";

/// 解析 hOCR 文档，按文档顺序返回单词
pub fn parse_hocr(hocr: &str) -> Vec<OcrWord> {
    let mut words = Vec::new();
    let mut pos = 0;

    while let Some(caps) = TAG.captures_at(hocr, pos) {
        let Some(whole) = caps.get(0) else { break };
        pos = whole.end();

        let is_close = !caps[1].is_empty();
        let attrs = &caps[3];
        if is_close || !has_class(attrs, WORD_CLASS) {
            continue;
        }

        let tag_name = caps[2].to_ascii_lowercase();
        let (inner_end, close_end) = if is_self_closing(attrs) {
            (whole.end(), whole.end())
        } else {
            find_element_end(hocr, whole.end(), &tag_name).unwrap_or((hocr.len(), hocr.len()))
        };
        pos = close_end;

        let text = decode_entities(&TAG.replace_all(&hocr[whole.end()..inner_end], ""))
            .replace('\u{00a0}', " ");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let title = attr_value(attrs, "title").unwrap_or_default();
        let Some(bbox) = parse_title_bbox(&title) else {
            log::debug!("[hOCR] 单词缺少 bbox，跳过: {:?}", text);
            continue;
        };
        if bbox.is_degenerate() {
            log::debug!("[hOCR] 单词 bbox 无效，跳过: {:?} {:?}", text, bbox);
            continue;
        }

        words.push(OcrWord {
            text: text.to_string(),
            confidence: parse_title_number(&title, "x_wconf"),
            bbox,
        });
    }

    words
}

/// 读取 `ocr_page` 元素的 bbox 作为页面尺寸
pub fn hocr_page_size(hocr: &str) -> Option<(u32, u32)> {
    TAG.captures_iter(hocr)
        .filter(|caps| caps[1].is_empty() && has_class(&caps[3], "ocr_page"))
        .find_map(|caps| {
            let title = attr_value(&caps[3], "title")?;
            let bbox = parse_title_bbox(&title)?;
            if bbox.x1 < 1.0 || bbox.y1 < 1.0 {
                return None;
            }
            Some((bbox.x1.round() as u32, bbox.y1.round() as u32))
        })
}

/// 从 `start` 开始寻找同名元素的闭合标签，返回 (内容结束位置, 闭合标签结束位置)
fn find_element_end(doc: &str, start: usize, tag_name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = start;

    while let Some(caps) = TAG.captures_at(doc, pos) {
        let whole = caps.get(0)?;
        pos = whole.end();

        if !caps[2].eq_ignore_ascii_case(tag_name) {
            continue;
        }
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                return Some((whole.start(), whole.end()));
            }
        } else if !is_self_closing(&caps[3]) {
            depth += 1;
        }
    }

    None
}

fn is_self_closing(attrs: &str) -> bool {
    attrs.trim_end().ends_with('/')
}

fn has_class(attrs: &str, class: &str) -> bool {
    attr_value(attrs, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn attr_value(attrs: &str, name: &str) -> Option<String> {
    ATTR.captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| {
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
        })
}

/// title 属性由 `;` 分隔的属性组成，例如 `bbox 36 92 96 116; x_wconf 96`
fn title_property<'a>(title: &'a str, key: &str) -> Option<Vec<&'a str>> {
    title.split(';').find_map(|prop| {
        let mut parts = prop.split_whitespace();
        if parts.next()? == key {
            Some(parts.collect())
        } else {
            None
        }
    })
}

fn parse_title_bbox(title: &str) -> Option<BBox> {
    let values = title_property(title, "bbox")?;
    if values.len() < 4 {
        return None;
    }
    let nums: Vec<f32> = values[..4]
        .iter()
        .map(|v| v.parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    Some(BBox::new(nums[0], nums[1], nums[2], nums[3]))
}

fn parse_title_number(title: &str, key: &str) -> Option<f32> {
    title_property(title, key)?.first()?.parse().ok()
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{00a0}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
 <body>
  <div class='ocr_page' id='page_1' title='image "in.png"; bbox 0 0 640 480; ppageno 0'>
   <div class='ocr_carea' id='block_1_1' title="bbox 36 92 582 168">
    <p class='ocr_par' id='par_1_1' lang='eng' title="bbox 36 92 582 168">
     <span class='ocr_line' id='line_1_1' title="bbox 36 92 580 122; baseline 0 -6; x_size 30">
      <span class='ocrx_word' id='word_1_1' title='bbox 36 92 96 122; x_wconf 96'>Total</span>
      <span class='ocrx_word' id='word_1_2' title='bbox 109 92 190 122; x_wconf 91'><strong>AT&amp;T</strong></span>
      <span class='ocrx_word' id='word_1_3' title='bbox 200 92 200 122; x_wconf 40'>zero</span>
      <span class='ocrx_word' id='word_1_4' title='x_wconf 80'>nobox</span>
      <span class='ocrx_word' id='word_1_5' title='bbox 210 92 260 122; x_wconf 10'>   </span>
     </span>
    </p>
   </div>
  </div>
 </body>
</html>"#;

    #[test]
    fn test_parse_hocr_words() {
        let words = parse_hocr(SAMPLE);
        assert_eq!(words.len(), 2);

        assert_eq!(words[0].text, "Total");
        assert_eq!(words[0].bbox, BBox::new(36.0, 92.0, 96.0, 122.0));
        assert_eq!(words[0].confidence, Some(96.0));

        // 内部标签去除，实体解码
        assert_eq!(words[1].text, "AT&T");
        assert_eq!(words[1].confidence, Some(91.0));
    }

    #[test]
    fn test_parse_hocr_without_confidence() {
        let hocr = r#"<span title="bbox 1 2 3 4" class="ocr_line"><span class="ocrx_word" title="bbox 10 20 30 40">caf&#233;&nbsp;</span></span>"#;
        let words = parse_hocr(hocr);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "café");
        assert_eq!(words[0].confidence, None);
    }

    #[test]
    fn test_parse_hocr_nested_spans() {
        let hocr = r#"<span class='ocrx_word' title='bbox 0 0 20 10'>a<span class='ocrx_cinfo'>b</span>c</span><span class='ocrx_word' title='bbox 30 0 50 10'>d</span>"#;
        let words = parse_hocr(hocr);
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "d"]);
    }

    #[test]
    fn test_page_size() {
        assert_eq!(hocr_page_size(SAMPLE), Some((640, 480)));
        assert_eq!(hocr_page_size("<span class='ocrx_word' title='bbox 0 0 1 1'>a</span>"), None);
    }

    #[test]
    fn test_parse_hocr_empty() {
        assert!(parse_hocr("").is_empty());
        assert!(parse_hocr("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_decode_entities_keeps_unknown() {
        assert_eq!(decode_entities("a &bogus; &lt;b&gt; &#x41;"), "a &bogus; <b> A");
    }
}
