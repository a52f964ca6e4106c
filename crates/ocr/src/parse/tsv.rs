//! Tesseract TSV 解析

use crate::types::{BBox, OcrWord};

/// TSV 中页面行和单词行的 level
const PAGE_LEVEL: i32 = 1;
const WORD_LEVEL: i32 = 5;

/// level=1 的页面行记录了整页宽高
pub fn tsv_page_size(tsv: &str) -> Option<(u32, u32)> {
    tsv.lines().find_map(|line| {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 10 || cols[0].parse::<i32>().ok()? != PAGE_LEVEL {
            return None;
        }
        let width: u32 = cols[8].parse().ok()?;
        let height: u32 = cols[9].parse().ok()?;
        (width > 0 && height > 0).then_some((width, height))
    })
}

/// 解析 Tesseract TSV 输出
///
/// TSV 格式：
/// level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
///
/// 只保留 word 级别，坐标保持像素单位
pub fn parse_tsv(tsv: &str) -> Vec<OcrWord> {
    let mut words = Vec::new();

    for line in tsv.lines() {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        // 表头或损坏的行
        let Ok(level) = cols[0].parse::<i32>() else {
            continue;
        };
        let left: f32 = cols[6].parse().unwrap_or(0.0);
        let top: f32 = cols[7].parse().unwrap_or(0.0);
        let width: f32 = cols[8].parse().unwrap_or(0.0);
        let height: f32 = cols[9].parse().unwrap_or(0.0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();

        if level != WORD_LEVEL || text.is_empty() || conf < 0.0 {
            continue;
        }

        let bbox = BBox::from_xywh(left, top, width, height);
        if bbox.is_degenerate() {
            continue;
        }

        words.push(OcrWord {
            text: text.to_string(),
            confidence: Some(conf),
            bbox,
        });
    }

    words
}
