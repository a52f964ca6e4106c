//! 高亮流水线
//!
//! 单词列表 → 关键词过滤 → 坐标缩放 → 高亮框

use linch_ocr::{BBox, OcrWord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::keywords::{KeywordSet, MatchMode};
use crate::scale::Scale;

/// 过滤选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightOptions {
    pub mode: MatchMode,
    /// 低于该置信度的单词不参与匹配（未提供置信度的单词不受影响）
    pub min_confidence: Option<f32>,
}

/// 一个命中的单词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub text: String,
    /// 命中的关键词（小写）
    pub keyword: String,
    pub confidence: Option<f32>,
    /// 原始图片像素坐标
    pub source: BBox,
    /// 显示坐标
    pub bbox: BBox,
}

/// 查找需要高亮的单词，按输入顺序返回
pub fn find_highlights(
    words: &[OcrWord],
    keywords: &KeywordSet,
    options: &HighlightOptions,
    scale: Scale,
) -> Vec<Highlight> {
    let mut highlights = Vec::new();
    if keywords.is_empty() {
        return highlights;
    }

    let mut added_positions: HashSet<String> = HashSet::new();

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }

        if let (Some(min), Some(conf)) = (options.min_confidence, word.confidence) {
            if conf < min {
                log::debug!("[Highlight] 置信度过低，跳过: {:?} ({:.1})", text, conf);
                continue;
            }
        }

        let Some(keyword) = keywords.find_match(text, options.mode) else {
            continue;
        };

        let pos_key = position_key(&word.bbox);
        if !added_positions.insert(pos_key) {
            continue;
        }

        highlights.push(Highlight {
            text: text.to_string(),
            keyword: keyword.to_string(),
            confidence: word.confidence,
            source: word.bbox,
            bbox: scale.apply(&word.bbox),
        });
    }

    log::info!(
        "[Highlight] {} 个单词中命中 {} 个 (模式: {})",
        words.len(),
        highlights.len(),
        options.mode
    );

    highlights
}

fn position_key(bbox: &BBox) -> String {
    format!("{:.1},{:.1},{:.1},{:.1}", bbox.x0, bbox.y0, bbox.x1, bbox.y1)
}

/// 一次高亮的完整结果，CLI 以 JSON 输出
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightReport {
    pub image_width: u32,
    pub image_height: u32,
    pub display_width: f32,
    pub display_height: f32,
    pub mode: MatchMode,
    pub keywords: Vec<String>,
    pub word_count: usize,
    pub highlights: Vec<Highlight>,
}
