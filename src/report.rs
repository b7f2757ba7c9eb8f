//! 把各项操作的结果渲染成终端文本。

use std::io::Write;

use crate::assistant::{Answer, CompletionResult, SpellCheckReport, Summary};
use crate::parser::{DocumentStats, PageText};
use crate::session::DocumentAnalysis;

fn write_response(w: &mut dyn Write, response: &CompletionResult) -> std::io::Result<()> {
    match response {
        Ok(text) => writeln!(w, "{}", text.trim_end()),
        Err(e) => writeln!(w, "{}", e.sentinel()),
    }
}

fn heading(w: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(w, "{}", title)?;
    writeln!(w, "{}", "=".repeat(title.chars().count()))
}

pub fn print_pages(w: &mut dyn Write, name: &str, pages: &PageText) -> std::io::Result<()> {
    heading(w, name)?;
    writeln!(w, "{}", pages.full_text())
}

pub fn print_stats(w: &mut dyn Write, name: &str, stats: &DocumentStats) -> std::io::Result<()> {
    heading(w, &format!("Statistiques du document: {}", name))?;
    writeln!(w, "Pages: {}", stats.pages)?;
    writeln!(w, "Mots: {}", stats.words)?;
    writeln!(w, "Caractères: {}", stats.characters)
}

pub fn print_answer(w: &mut dyn Write, answer: &Answer) -> std::io::Result<()> {
    heading(w, "Réponse")?;
    write_response(w, &answer.response)?;
    if !answer.pages.is_empty() {
        let pages: Vec<String> = answer.pages.iter().map(u32::to_string).collect();
        writeln!(w)?;
        writeln!(w, "Pages concernées: {}", pages.join(", "))?;
    }
    Ok(())
}

pub fn print_summary(w: &mut dyn Write, summary: &Summary) -> std::io::Result<()> {
    heading(w, &format!("Résumé ({})", summary.length.label()))?;
    write_response(w, &summary.response)
}

pub fn print_spelling(w: &mut dyn Write, report: &SpellCheckReport) -> std::io::Result<()> {
    heading(w, "Vérification orthographique")?;

    let with_errors: Vec<_> = report.pages_with_errors().collect();
    let failed: Vec<_> = report.failed_pages().collect();
    if with_errors.is_empty() && failed.is_empty() {
        writeln!(w, "Aucune erreur détectée dans le document.")?;
    } else if with_errors.is_empty() {
        writeln!(w, "Aucune erreur détectée sur les pages analysées.")?;
    } else {
        writeln!(w, "{} page(s) contiennent des erreurs", with_errors.len())?;
        for page in with_errors {
            writeln!(w)?;
            writeln!(w, "Page {} - {} erreur(s)", page.page, page.findings().len())?;
            for (i, finding) in page.findings().iter().enumerate() {
                writeln!(
                    w,
                    "  {}. [{}] {} -> {}",
                    i + 1,
                    finding.kind.as_str(),
                    finding.erroneous_text,
                    finding.correction
                )?;
            }
        }
    }

    if !failed.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} page(s) n'ont pas pu être analysées:", failed.len())?;
        for (page, err) in failed {
            writeln!(w, "  Page {}: {}", page, err)?;
        }
    }
    Ok(())
}

pub fn print_analysis(w: &mut dyn Write, analysis: &DocumentAnalysis) -> std::io::Result<()> {
    let lexical = &analysis.lexical;

    heading(w, "Statistiques lexicales")?;
    writeln!(w, "Vocabulaire unique: {}", lexical.unique_tokens)?;
    writeln!(w, "Mots totaux: {}", lexical.total_tokens)?;
    writeln!(w, "Richesse lexicale: {}", lexical.richness_display())?;

    writeln!(w)?;
    writeln!(w, "Mots les plus fréquents:")?;
    for word in &lexical.top_words {
        writeln!(w, "  • {}: {} fois", word.word, word.count)?;
    }

    writeln!(w)?;
    heading(w, "Analyse sémantique")?;
    write_response(w, &analysis.semantic)?;

    writeln!(w)?;
    heading(w, "Distribution du contenu par page")?;
    for (page, words) in &analysis.words_per_page {
        writeln!(w, "  Page {:>4}: {} mots", page, words)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::client::ERROR_MARKER;
    use crate::assistant::spelling::{FindingKind, SpellingFinding};
    use crate::assistant::{CompletionError, PageFindings, SpellCheckError, SummaryLength};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn answer_lists_pages() {
        let answer = Answer {
            question: "q".to_string(),
            response: Ok("Voir page 2.".to_string()),
            pages: vec![2, 4],
        };
        let out = render(|w| print_answer(w, &answer));
        assert!(out.contains("Voir page 2."));
        assert!(out.contains("Pages concernées: 2, 4"));
    }

    #[test]
    fn failed_answer_shows_marker() {
        let answer = Answer {
            question: "q".to_string(),
            response: Err(CompletionError::EmptyResponse),
            pages: vec![],
        };
        let out = render(|w| print_answer(w, &answer));
        assert!(out.contains(ERROR_MARKER));
        assert!(!out.contains("Pages concernées"));
    }

    #[test]
    fn spelling_report_shows_findings_and_failures() {
        let report = SpellCheckReport {
            pages: vec![
                PageFindings {
                    page: 1,
                    outcome: Ok(vec![SpellingFinding {
                        erroneous_text: "sont".to_string(),
                        correction: "est".to_string(),
                        kind: FindingKind::Grammaire,
                    }]),
                },
                PageFindings {
                    page: 2,
                    outcome: Err(SpellCheckError::MissingField("erreurs")),
                },
            ],
        };
        let out = render(|w| print_spelling(w, &report));
        assert!(out.contains("Page 1 - 1 erreur(s)"));
        assert!(out.contains("[grammaire] sont -> est"));
        assert!(out.contains("1 page(s) n'ont pas pu être analysées"));
        assert!(out.contains("Page 2:"));
    }

    #[test]
    fn clean_report() {
        let report = SpellCheckReport {
            pages: vec![PageFindings {
                page: 1,
                outcome: Ok(vec![]),
            }],
        };
        let out = render(|w| print_spelling(w, &report));
        assert!(out.contains("Aucune erreur détectée"));
    }

    #[test]
    fn failed_pages_do_not_read_as_clean_document() {
        let report = SpellCheckReport {
            pages: vec![
                PageFindings {
                    page: 1,
                    outcome: Ok(vec![]),
                },
                PageFindings {
                    page: 2,
                    outcome: Err(SpellCheckError::CountMismatch {
                        declared: 3,
                        listed: 0,
                    }),
                },
            ],
        };
        let out = render(|w| print_spelling(w, &report));
        assert!(!out.contains("Aucune erreur détectée dans le document."));
        assert!(out.contains("Aucune erreur détectée sur les pages analysées."));
        assert!(out.contains("Page 2:"));
    }

    #[test]
    fn summary_heading_uses_display_name() {
        let summary = Summary {
            length: SummaryLength::Detaille,
            response: Ok("Résumé du document.".to_string()),
        };
        let out = render(|w| print_summary(w, &summary));
        assert!(out.contains("Résumé (Détaillé)"));
        assert!(!out.contains("Detaille"));
    }
}
