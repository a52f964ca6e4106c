//! 关键词匹配
//!
//! 关键词统一小写存储，匹配时忽略大小写。

use serde::{Deserialize, Serialize};

/// 匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// 单词包含关键词即命中
    #[default]
    Substring,
    /// 单词本身，或去掉首尾标点后的单词，与关键词完全相同
    Exact,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::Exact => write!(f, "exact"),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" | "contains" => Ok(MatchMode::Substring),
            "exact" => Ok(MatchMode::Exact),
            other => Err(format!("unknown match mode: {}", other)),
        }
    }
}

/// 关键词集合
///
/// 去除首尾空白、转小写、去掉空项和重复项，保留首次出现的顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for keyword in keywords {
            set.add(keyword.as_ref());
        }
        set
    }

    /// 解析用户输入，逗号或换行分隔
    pub fn parse(input: &str) -> Self {
        Self::new(input.split([',', '\n']))
    }

    /// 添加关键词，返回是否为新关键词
    pub fn add(&mut self, keyword: &str) -> bool {
        let normalized = keyword.trim().to_lowercase();
        if normalized.is_empty() || self.keywords.contains(&normalized) {
            return false;
        }
        self.keywords.push(normalized);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keywords.clone()
    }

    /// 返回第一个命中的关键词（按列表顺序）
    pub fn find_match(&self, text: &str, mode: MatchMode) -> Option<&str> {
        if self.keywords.is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        // 关键词本身保持原样，只去掉单词首尾的标点
        let trimmed = trim_punctuation(&lowered);

        self.iter().find(|keyword| match mode {
            MatchMode::Substring => lowered.contains(keyword),
            MatchMode::Exact => lowered == *keyword || trimmed == *keyword,
        })
    }

    pub fn matches(&self, text: &str, mode: MatchMode) -> bool {
        self.find_match(text, mode).is_some()
    }
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_matches(|c: char| !c.is_alphanumeric())
}
