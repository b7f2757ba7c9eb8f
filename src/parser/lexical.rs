use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::PageText;
use crate::config::AnalysisConfig;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// 一次词汇分析的结果，不做持久化
#[derive(Debug, Clone, Serialize)]
pub struct LexicalStats {
    pub total_tokens: usize,
    pub unique_tokens: usize,
    /// 百分比，没有词时为 0
    pub richness: f64,
    pub frequencies: HashMap<String, usize>,
    pub top_words: Vec<WordCount>,
}

impl LexicalStats {
    pub fn richness_display(&self) -> String {
        format!("{:.1}%", self.richness)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub pages: usize,
    pub words: usize,
    pub characters: usize,
    pub words_per_page: Vec<(u32, usize)>,
}

pub struct LexicalAnalyzer {
    top_words: usize,
    min_word_len: usize,
}

impl LexicalAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            top_words: config.top_words,
            min_word_len: config.min_word_len,
        }
    }

    /// 小写后提取所有 `\w+` 词
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn analyze(&self, text: &str) -> LexicalStats {
        let tokens = Self::tokenize(text);

        // 记录首次出现位置，同频词按出现先后排序
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for token in &tokens {
            let count = frequencies.entry(token.clone()).or_insert(0);
            if *count == 0 {
                order.push(token);
            }
            *count += 1;
        }

        let mut ranked: Vec<(usize, &str)> = order.iter().copied().enumerate().collect();
        ranked.sort_by(|(ia, a), (ib, b)| frequencies[*b].cmp(&frequencies[*a]).then(ia.cmp(ib)));

        // 先取前 N 个高频词，再过滤掉短词
        let top_words: Vec<WordCount> = ranked
            .into_iter()
            .take(self.top_words)
            .filter(|(_, word)| word.chars().count() >= self.min_word_len)
            .map(|(_, word)| WordCount {
                word: word.to_string(),
                count: frequencies[word],
            })
            .collect();

        let total_tokens = tokens.len();
        let unique_tokens = frequencies.len();
        let richness = richness(unique_tokens, total_tokens);
        debug!("词汇统计: {} 词, {} 个不同词", total_tokens, unique_tokens);

        LexicalStats {
            total_tokens,
            unique_tokens,
            richness,
            frequencies,
            top_words,
        }
    }

    /// 页数、词数、字符数以及每页词数
    pub fn document_stats(&self, pages: &PageText) -> DocumentStats {
        let full_text = pages.full_text();
        let words_per_page: Vec<(u32, usize)> = pages
            .iter()
            .map(|(page, text)| (page, text.split_whitespace().count()))
            .collect();

        let stats = DocumentStats {
            pages: pages.len(),
            words: full_text.split_whitespace().count(),
            characters: full_text.chars().count(),
            words_per_page,
        };
        info!("文档统计: {} 页, {} 词, {} 字符", stats.pages, stats.words, stats.characters);
        stats
    }
}

/// 不同词占总词数的百分比
pub fn richness(unique: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    unique as f64 / total as f64 * 100.0
}
