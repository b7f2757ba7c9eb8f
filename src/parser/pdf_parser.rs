use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, warn};

use super::PageText;
use crate::utils::{AppError, AppResult};

pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    /// 读取PDF文件并逐页提取文本
    pub fn extract_file(&self, pdf_path: &Path) -> AppResult<PageText> {
        info!("解析PDF: {}", pdf_path.display());

        if !pdf_path.exists() {
            return Err(AppError::PdfError(format!(
                "PDF文件不存在: {}",
                pdf_path.display()
            )));
        }

        let bytes = std::fs::read(pdf_path)?;
        self.extract_pages(&bytes)
    }

    /// 逐页提取文本
    ///
    /// 文档结构损坏时整体失败；单页提取失败只得到空字符串，
    /// 加密或纯图片的页面同样原样返回空文本。
    pub fn extract_pages(&self, bytes: &[u8]) -> AppResult<PageText> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| AppError::PdfError(format!("无法解析PDF结构: {}", e)))?;

        let pages = doc.get_pages();
        debug!("PDF共 {} 页", pages.len());

        let texts: Vec<String> = pages
            .keys()
            .map(|&page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("第 {} 页文本提取失败: {}", page_num, e);
                    String::new()
                }
            })
            .collect();

        let page_text = PageText::from_pages(texts);
        if page_text.is_empty() {
            warn!("PDF中没有页面");
            return Ok(page_text);
        }

        let empty = page_text.iter().filter(|(_, t)| t.trim().is_empty()).count();
        if empty > 0 {
            warn!("{} 页未提取到文本内容", empty);
        }
        info!("成功提取 {} 页文本", page_text.len());

        Ok(page_text)
    }
}
