pub mod lexical;
pub mod pdf_parser;

pub use lexical::{DocumentStats, LexicalAnalyzer, LexicalStats};
pub use pdf_parser::PdfParser;

use serde::Serialize;
use std::collections::BTreeMap;

/// 逐页提取的文本，页码从 1 开始且连续
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageText {
    pages: BTreeMap<u32, String>,
}

impl PageText {
    /// 按文档顺序编号，第 i 个元素成为第 i+1 页
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| (i as u32 + 1, text))
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.pages.iter().map(|(page, text)| (*page, text.as_str()))
    }

    /// 拼接全文作为模型上下文：每页前加 `=== Page N ===`，页之间空一行
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|(page, text)| format!("=== Page {} ===\n{}", page, text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
