use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::assistant::{
    Answer, Assistant, CompletionClient, CompletionResult, SpellCheckReport, Summary,
    SummaryLength,
};
use crate::config::{AppConfig, API_KEY_ENV};
use crate::parser::{DocumentStats, LexicalAnalyzer, LexicalStats, PageText, PdfParser};
use crate::utils::{AppError, AppResult};

/// 词汇统计与模型语义分析的合并结果
#[derive(Debug, Serialize)]
pub struct DocumentAnalysis {
    pub lexical: LexicalStats,
    pub words_per_page: Vec<(u32, usize)>,
    pub semantic: CompletionResult,
}

/// 一个用户会话：已加载的文档加上可复用的模型客户端
///
/// 没有 API 密钥时依然可以提取文本和做本地统计，
/// 需要模型的操作返回 [`AppError::MissingApiKey`]。
pub struct DocumentSession {
    name: String,
    pages: PageText,
    config: AppConfig,
    assistant: Option<Assistant>,
}

impl DocumentSession {
    pub fn open(pdf_path: &Path, config: AppConfig) -> AppResult<Self> {
        let pages = PdfParser::new().extract_file(pdf_path)?;
        let name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| pdf_path.display().to_string());
        Self::from_pages(name, pages, config)
    }

    pub fn from_pages(name: String, pages: PageText, config: AppConfig) -> AppResult<Self> {
        let assistant = if config.assistant.has_api_key() {
            let client = CompletionClient::new(config.assistant.clone())?;
            Some(Assistant::new(client))
        } else {
            warn!("{} 未设置，只能使用本地统计功能", API_KEY_ENV);
            None
        };

        info!("会话已建立: {} ({} 页)", name, pages.len());
        Ok(Self {
            name,
            pages,
            config,
            assistant,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pages(&self) -> &PageText {
        &self.pages
    }

    fn assistant(&self) -> AppResult<&Assistant> {
        self.assistant
            .as_ref()
            .ok_or(AppError::MissingApiKey(API_KEY_ENV))
    }

    fn analyzer(&self) -> LexicalAnalyzer {
        LexicalAnalyzer::new(&self.config.analysis)
    }

    pub fn stats(&self) -> DocumentStats {
        self.analyzer().document_stats(&self.pages)
    }

    pub async fn ask(&self, question: &str) -> AppResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyQuestion);
        }
        Ok(self.assistant()?.ask(&self.pages, question).await)
    }

    pub async fn summarize(&self, length: SummaryLength) -> AppResult<Summary> {
        Ok(self.assistant()?.summarize(&self.pages, length).await)
    }

    pub async fn check_spelling(&self) -> AppResult<SpellCheckReport> {
        Ok(self.assistant()?.check_spelling(&self.pages).await)
    }

    /// 词汇统计基于带页标记的全文
    pub async fn analyze(&self) -> AppResult<DocumentAnalysis> {
        let assistant = self.assistant()?;
        let full_text = self.pages.full_text();
        let lexical = self.analyzer().analyze(&full_text);
        let words_per_page = self.stats().words_per_page;
        let semantic = assistant.semantic_analysis(&full_text).await;

        Ok(DocumentAnalysis {
            lexical,
            words_per_page,
            semantic,
        })
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        debug!("会话结束: {}", self.name);
    }
}
