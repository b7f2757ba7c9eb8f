mod assistant;
mod config;
mod parser;
mod report;
mod session;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::assistant::SummaryLength;
use crate::config::{AppConfig, API_KEY_ENV, SETTINGS_PATH};
use crate::session::DocumentSession;
use crate::utils::logger;

#[derive(Parser)]
#[command(name = "insightpdf")]
#[command(about = "PDF 文档问答、摘要、拼写检查与词汇分析", long_about = None)]
struct Cli {
    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成默认配置文件
    Init,
    /// 输出逐页提取的文本
    Pages { pdf: PathBuf },
    /// 页数、词数、字符数
    Stats { pdf: PathBuf },
    /// 针对文档提问
    Ask {
        pdf: PathBuf,
        #[arg(value_parser = non_blank)]
        question: String,
    },
    /// 生成文档摘要
    Summarize {
        pdf: PathBuf,
        #[arg(short, long, value_enum, default_value = "moyen")]
        length: SummaryLength,
    },
    /// 逐页检查拼写与语法
    Spellcheck { pdf: PathBuf },
    /// 词汇统计与语义分析
    Analyze { pdf: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init_command()?,
        Commands::Pages { pdf } => {
            let session = open_session(&pdf)?;
            if cli.json {
                print_json(session.pages())?;
            } else {
                report::print_pages(&mut std::io::stdout(), session.name(), session.pages())?;
            }
        }
        Commands::Stats { pdf } => {
            let session = open_session(&pdf)?;
            let stats = session.stats();
            if cli.json {
                print_json(&stats)?;
            } else {
                report::print_stats(&mut std::io::stdout(), session.name(), &stats)?;
            }
        }
        Commands::Ask { pdf, question } => {
            let session = open_session(&pdf)?;
            let answer = session.ask(&question).await?;
            if cli.json {
                print_json(&answer)?;
            } else {
                report::print_answer(&mut std::io::stdout(), &answer)?;
            }
        }
        Commands::Summarize { pdf, length } => {
            let session = open_session(&pdf)?;
            let summary = session.summarize(length).await?;
            if cli.json {
                print_json(&summary)?;
            } else {
                report::print_summary(&mut std::io::stdout(), &summary)?;
            }
        }
        Commands::Spellcheck { pdf } => {
            let session = open_session(&pdf)?;
            let spelling = session.check_spelling().await?;
            if cli.json {
                print_json(&spelling)?;
            } else {
                report::print_spelling(&mut std::io::stdout(), &spelling)?;
            }
        }
        Commands::Analyze { pdf } => {
            let session = open_session(&pdf)?;
            let analysis = session.analyze().await?;
            if cli.json {
                print_json(&analysis)?;
            } else {
                report::print_analysis(&mut std::io::stdout(), &analysis)?;
            }
        }
    }

    Ok(())
}

fn init_command() -> Result<()> {
    info!("初始化配置...");

    let path = Path::new(SETTINGS_PATH);
    if path.exists() {
        info!("配置文件已存在，跳过: {}", SETTINGS_PATH);
        return Ok(());
    }

    AppConfig::default().save(path)?;
    info!("已生成配置文件: {}", SETTINGS_PATH);
    info!("下一步: 在 .env 或环境变量中设置 {}", API_KEY_ENV);
    Ok(())
}

fn non_blank(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("问题不能为空".to_string());
    }
    Ok(value.to_string())
}

fn open_session(pdf: &Path) -> Result<DocumentSession> {
    let config = AppConfig::load()?;
    let session = DocumentSession::open(pdf, config)?;
    Ok(session)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_rejects_blank_question() {
        assert!(Cli::try_parse_from(["insightpdf", "ask", "doc.pdf", "   "]).is_err());
        assert!(Cli::try_parse_from(["insightpdf", "ask", "doc.pdf", ""]).is_err());

        let cli = Cli::try_parse_from(["insightpdf", "ask", "doc.pdf", " Quel sujet ? "]).unwrap();
        match cli.command {
            Commands::Ask { question, .. } => assert_eq!(question, "Quel sujet ?"),
            _ => panic!("expected ask"),
        }
    }
}
