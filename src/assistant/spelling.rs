use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

// 贪婪匹配：从第一个 `{` 到最后一个 `}`，避免示例文本里的嵌套括号提前截断
static JSON_OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    Orthographe,
    Grammaire,
    Other(String),
}

impl FindingKind {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "orthographe" => FindingKind::Orthographe,
            "grammaire" => FindingKind::Grammaire,
            _ => FindingKind::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FindingKind::Orthographe => "orthographe",
            FindingKind::Grammaire => "grammaire",
            FindingKind::Other(raw) => raw,
        }
    }
}

impl Serialize for FindingKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 一处拼写或语法错误
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellingFinding {
    pub erroneous_text: String,
    pub correction: String,
    pub kind: FindingKind,
}

// 字段缺失或为 null 都按空字符串处理
#[derive(Deserialize)]
struct RawFinding {
    #[serde(default)]
    texte: Option<String>,
    #[serde(default)]
    correction: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// 单页检查失败的原因，只影响这一页
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum SpellCheckError {
    #[error("{0}")]
    Completion(String),

    #[error("响应中没有 JSON 对象")]
    NoJson,

    #[error("JSON 解析失败: {0}")]
    InvalidJson(String),

    #[error("JSON 缺少字段 `{0}`")]
    MissingField(&'static str),

    #[error("声明了 {declared} 处错误，但只列出 {listed} 处")]
    CountMismatch { declared: u64, listed: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct PageFindings {
    pub page: u32,
    pub outcome: Result<Vec<SpellingFinding>, SpellCheckError>,
}

impl PageFindings {
    pub fn findings(&self) -> &[SpellingFinding] {
        match &self.outcome {
            Ok(findings) => findings.as_slice(),
            Err(_) => &[],
        }
    }
}

/// 整个文档的拼写检查结果，按页码排列
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpellCheckReport {
    pub pages: Vec<PageFindings>,
}

impl SpellCheckReport {
    pub fn pages_with_errors(&self) -> impl Iterator<Item = &PageFindings> {
        self.pages.iter().filter(|p| !p.findings().is_empty())
    }

    pub fn failed_pages(&self) -> impl Iterator<Item = (u32, &SpellCheckError)> {
        self.pages.iter().filter_map(|p| match &p.outcome {
            Err(e) => Some((p.page, e)),
            Ok(_) => None,
        })
    }

    pub fn total_findings(&self) -> usize {
        self.pages.iter().map(|p| p.findings().len()).sum()
    }
}

/// 从模型回复中取出 JSON 并校验 `erreurs` / `nombre_erreurs`
pub fn parse_spelling_response(response: &str) -> Result<Vec<SpellingFinding>, SpellCheckError> {
    let raw = JSON_OBJECT_RE
        .find(response)
        .ok_or(SpellCheckError::NoJson)?
        .as_str();

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| SpellCheckError::InvalidJson(e.to_string()))?;

    let count = value
        .get("nombre_erreurs")
        .and_then(|v| v.as_f64())
        .ok_or(SpellCheckError::MissingField("nombre_erreurs"))?;
    if count <= 0.0 {
        return Ok(Vec::new());
    }

    let errors = value
        .get("erreurs")
        .and_then(|v| v.as_array())
        .ok_or(SpellCheckError::MissingField("erreurs"))?;
    if errors.is_empty() {
        return Err(SpellCheckError::CountMismatch {
            declared: count as u64,
            listed: 0,
        });
    }

    let findings = errors
        .iter()
        .map(|item| {
            serde_json::from_value::<RawFinding>(item.clone())
                .map(|raw| SpellingFinding {
                    erroneous_text: raw.texte.unwrap_or_default(),
                    correction: raw.correction.unwrap_or_default(),
                    kind: FindingKind::parse(raw.kind.as_deref().unwrap_or_default()),
                })
                .map_err(|e| SpellCheckError::InvalidJson(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("解析到 {} 处错误", findings.len());
    Ok(findings)
}
