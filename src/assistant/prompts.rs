//! 发给模型的提示词，保持与界面一致的法语措辞。

use clap::ValueEnum;
use serde::Serialize;

pub const SYSTEM_PROMPT: &str = "Tu es un assistant expert en analyse de documents. Réponds de manière précise et structurée.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum SummaryLength {
    Court,
    Moyen,
    Detaille,
}

impl SummaryLength {
    /// 界面上显示的名称
    pub fn label(self) -> &'static str {
        match self {
            SummaryLength::Court => "Court",
            SummaryLength::Moyen => "Moyen",
            SummaryLength::Detaille => "Détaillé",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            SummaryLength::Court => "en 3-5 phrases",
            SummaryLength::Moyen => "en 2-3 paragraphes",
            SummaryLength::Detaille => "de manière détaillée avec les points clés",
        }
    }
}

pub fn question_context(full_text: &str) -> String {
    format!("Voici le contenu du document par page:\n\n{}", full_text)
}

pub fn question_prompt(question: &str) -> String {
    format!(
        "Question: {}\n\nRéponds de manière claire et cite les numéros de pages pertinentes.",
        question
    )
}

pub fn summary_prompt(length: SummaryLength) -> String {
    format!(
        "Fais un résumé {} de ce document. Structure ton résumé de manière claire.",
        length.instruction()
    )
}

/// 要求模型以固定 JSON 结构返回单页的拼写与语法错误
pub fn spelling_prompt(page_text: &str) -> String {
    format!(
        r#"Analyse ce texte et identifie UNIQUEMENT les erreurs d'orthographe et de grammaire réelles.

Texte à analyser:
{page_text}

Réponds au format JSON:
{{
    "erreurs": [
        {{"texte": "mot ou phrase erronée", "correction": "correction proposée", "type": "orthographe/grammaire"}}
    ],
    "nombre_erreurs": nombre
}}

Si aucune erreur, retourne {{"erreurs": [], "nombre_erreurs": 0}}"#
    )
}

pub const SEMANTIC_PROMPT: &str = "Analyse ce document et fournis:
1. Les thèmes principaux abordés
2. Le ton général (formel, informel, technique, etc.)
3. Les mots-clés les plus importants (10 minimum)
4. Le type de document (article, rapport, étude, etc.)
5. Le public cible probable

Structure ta réponse clairement avec des sections.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_carries_length_instruction() {
        assert!(summary_prompt(SummaryLength::Court).contains("en 3-5 phrases"));
        assert!(summary_prompt(SummaryLength::Detaille).contains("points clés"));
    }

    #[test]
    fn labels_are_display_names() {
        assert_eq!(SummaryLength::Court.label(), "Court");
        assert_eq!(SummaryLength::Detaille.label(), "Détaillé");
    }

    #[test]
    fn spelling_prompt_embeds_page_and_schema() {
        let prompt = spelling_prompt("Le chat sont noir.");
        assert!(prompt.contains("Le chat sont noir."));
        assert!(prompt.contains(r#""nombre_erreurs": 0"#));
        assert!(prompt.contains(r#"{"texte": "mot ou phrase erronée""#));
    }
}
