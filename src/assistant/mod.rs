pub mod client;
pub mod prompts;
pub mod references;
pub mod spelling;

pub use client::{CompletionClient, CompletionError, CompletionResult};
pub use prompts::SummaryLength;
pub use references::find_relevant_pages;
pub use spelling::{parse_spelling_response, PageFindings, SpellCheckError, SpellCheckReport};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::parser::PageText;
use prompts::SYSTEM_PROMPT;

/// 问答结果，只有成功的回答才会提取页码
#[derive(Debug, Serialize)]
pub struct Answer {
    pub question: String,
    pub response: CompletionResult,
    pub pages: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub length: SummaryLength,
    pub response: CompletionResult,
}

/// 基于补全接口的四种文档操作
pub struct Assistant {
    client: CompletionClient,
    concurrency: usize,
}

impl Assistant {
    pub fn new(client: CompletionClient) -> Self {
        let concurrency = client.config().concurrency.max(1);
        Self {
            client,
            concurrency,
        }
    }

    pub async fn ask(&self, pages: &PageText, question: &str) -> Answer {
        info!("提问: {}", question);
        let context = prompts::question_context(&pages.full_text());
        let response = self
            .client
            .complete(SYSTEM_PROMPT, &prompts::question_prompt(question), &context)
            .await;

        let pages = match &response {
            Ok(text) => find_relevant_pages(pages.page_numbers(), text),
            Err(e) => {
                warn!("问答失败: {}", e);
                Vec::new()
            }
        };

        Answer {
            question: question.to_string(),
            response,
            pages,
        }
    }

    pub async fn summarize(&self, pages: &PageText, length: SummaryLength) -> Summary {
        info!("生成摘要: {:?}", length);
        let response = self
            .client
            .complete(SYSTEM_PROMPT, &prompts::summary_prompt(length), &pages.full_text())
            .await;
        if let Err(ref e) = response {
            warn!("摘要生成失败: {}", e);
        }
        Summary { length, response }
    }

    /// 每页一次请求，最多 `concurrency` 个同时进行；结果保持页码顺序，
    /// 单页失败记录在该页结果中，不影响其他页
    pub async fn check_spelling(&self, pages: &PageText) -> SpellCheckReport {
        info!("拼写检查: {} 页，并发 {}", pages.len(), self.concurrency);

        let results: Vec<PageFindings> = stream::iter(
            pages
                .iter()
                .map(|(page, text)| self.check_page(page, text)),
        )
        .buffered(self.concurrency)
        .collect()
        .await;

        let report = SpellCheckReport { pages: results };
        info!(
            "拼写检查完成: {} 处错误，{} 页失败",
            report.total_findings(),
            report.failed_pages().count()
        );
        report
    }

    async fn check_page(&self, page: u32, text: &str) -> PageFindings {
        info!("检查第 {} 页", page);
        let outcome = match self
            .client
            .complete(SYSTEM_PROMPT, &prompts::spelling_prompt(text), "")
            .await
        {
            Ok(response) => parse_spelling_response(&response),
            Err(e) => Err(SpellCheckError::Completion(e.sentinel())),
        };

        if let Err(ref e) = outcome {
            warn!("第 {} 页检查失败: {}", page, e);
        }
        PageFindings { page, outcome }
    }

    pub async fn semantic_analysis(&self, full_text: &str) -> CompletionResult {
        info!("语义分析");
        self.client
            .complete(SYSTEM_PROMPT, prompts::SEMANTIC_PROMPT, full_text)
            .await
    }
}
