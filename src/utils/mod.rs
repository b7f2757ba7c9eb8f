pub mod logger;

use thiserror::Error;

/// 致命错误：当前命令无法继续
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    ConfigError(#[from] ::config::ConfigError),

    #[error("未找到 API 密钥，请在环境变量或 .env 文件中设置 {0}")]
    MissingApiKey(&'static str),

    #[error("问题不能为空")]
    EmptyQuestion,

    #[error("模型客户端错误: {0}")]
    ClientError(#[from] crate::assistant::CompletionError),

    #[error("PDF处理错误: {0}")]
    PdfError(String),

    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
