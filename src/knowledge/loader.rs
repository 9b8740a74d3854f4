//! Parsing of the newline-delimited keyword lists maintained outside the engine.
//!
//! Every list skips blank lines and `#` comments. The indications list may be split
//! into `[diseases]`, `[symptoms]` and `[indicators]` sections with pipe-delimited
//! fields:
//!
//! ```text
//! [diseases]
//! 肺癌 | 0.95 | 肺部肿瘤, NSCLC
//! melanoma
//! [symptoms]
//! fever | low-grade, moderate, high-grade
//! [indicators]
//! HbA1c
//! ```

use std::fs;
use std::path::Path;
use tracing::info;

use super::types::{Disease, KnowledgeBase, Symptom};
use super::DEFAULT_RELIABILITY;
use crate::error::KnowledgeBaseError;
use crate::TARGET_KNOWLEDGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Diseases,
    Symptoms,
    Indicators,
}

/// Trimmed, de-duplicated entries of a plain keyword list, in file order.
pub fn parse_keyword_list(text: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in meaningful_lines(text).map(|(_, line)| line) {
        if !entries.iter().any(|e| e == line) {
            entries.push(line.to_string());
        }
    }
    entries
}

/// Parses an indications list into a knowledge base holding diseases, symptoms and indicators.
pub fn parse_indications(text: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let mut kb = KnowledgeBase::new();
    let mut section = Section::Diseases;

    for (line_no, line) in meaningful_lines(text) {
        if line.starts_with('[') && line.ends_with(']') {
            section = match line[1..line.len() - 1].trim().to_lowercase().as_str() {
                "diseases" | "indications" => Section::Diseases,
                "symptoms" => Section::Symptoms,
                "indicators" => Section::Indicators,
                other => {
                    return Err(KnowledgeBaseError::Parse {
                        line: line_no,
                        reason: format!("unknown section '{}'", other),
                    })
                }
            };
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        match section {
            Section::Diseases => kb.add_disease(parse_disease(line_no, &fields)?)?,
            Section::Symptoms => {
                let symptom = Symptom::new(fields[0])
                    .with_descriptors(fields.get(1).map(|f| split_list(f)).unwrap_or_default());
                kb.add_symptom(symptom);
            }
            Section::Indicators => kb.add_indicator(fields[0]),
        }
    }

    Ok(kb)
}

fn parse_disease(line_no: usize, fields: &[&str]) -> Result<Disease, KnowledgeBaseError> {
    let name = fields[0];
    if name.is_empty() {
        return Err(KnowledgeBaseError::Parse {
            line: line_no,
            reason: "disease name is empty".to_string(),
        });
    }

    let reliability = match fields.get(1).filter(|f| !f.is_empty()) {
        Some(raw) => raw.parse::<f64>().map_err(|_| KnowledgeBaseError::Parse {
            line: line_no,
            reason: format!("invalid reliability '{}'", raw),
        })?,
        None => DEFAULT_RELIABILITY,
    };

    let mut keywords = vec![name.to_string()];
    if let Some(extra) = fields.get(2) {
        keywords.extend(split_list(extra));
    }

    Ok(Disease::new(&Disease::id_from_name(name), name, reliability).with_keywords(keywords))
}

fn split_list(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Yields (1-based line number, trimmed line) for non-blank, non-comment lines.
fn meaningful_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn read_file(path: &Path) -> Result<String, KnowledgeBaseError> {
    fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl KnowledgeBase {
    /// Loads the three externally maintained lists. Any list may be omitted.
    pub fn from_files(
        companies: Option<&Path>,
        drugs: Option<&Path>,
        indications: Option<&Path>,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut kb = match indications {
            Some(path) => {
                let kb = parse_indications(&read_file(path)?)?;
                info!(
                    target: TARGET_KNOWLEDGE,
                    "Loaded {} diseases, {} symptoms, {} indicators from {}",
                    kb.diseases().len(), kb.symptoms().len(), kb.indicators().len(), path.display()
                );
                kb
            }
            None => KnowledgeBase::new(),
        };

        if let Some(path) = companies {
            let names = parse_keyword_list(&read_file(path)?);
            info!(target: TARGET_KNOWLEDGE, "Loaded {} company names from {}", names.len(), path.display());
            kb = kb.with_companies(names);
        }

        if let Some(path) = drugs {
            let names = parse_keyword_list(&read_file(path)?);
            info!(target: TARGET_KNOWLEDGE, "Loaded {} drug names from {}", names.len(), path.display());
            kb = kb.with_drugs(names);
        }

        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_list_skips_comments_and_blanks() {
        let text = "# companies\nPfizer\n\n  Moderna  \n#Merck\nPfizer\n";
        assert_eq!(parse_keyword_list(text), vec!["Pfizer", "Moderna"]);
    }

    #[test]
    fn indications_default_to_disease_section() {
        let kb = parse_indications("# list\nmelanoma\n肺癌 | 0.95 | 肺部肿瘤, NSCLC\n").unwrap();
        assert_eq!(kb.diseases().len(), 2);
        assert_eq!(kb.diseases()[0].reliability, DEFAULT_RELIABILITY);
        let lung = kb.disease_by_keyword("nsclc").unwrap();
        assert_eq!(lung.name, "肺癌");
        assert_eq!(lung.keywords, vec!["肺癌", "肺部肿瘤", "NSCLC"]);
    }

    #[test]
    fn sections_route_entries() {
        let text = "[symptoms]\nfever | low-grade, moderate, high-grade\nnausea\n\
                    [indicators]\nHbA1c\n[diseases]\nAsthma | | wheezing disease";
        let kb = parse_indications(text).unwrap();
        assert_eq!(kb.symptom("Fever").and_then(|s| s.severity_weight()), Some(3));
        assert_eq!(kb.symptom("nausea").and_then(|s| s.severity_weight()), None);
        assert_eq!(kb.indicators(), ["HbA1c"]);
        assert_eq!(kb.disease_by_keyword("wheezing disease").unwrap().id, "asthma");
    }

    #[test]
    fn reports_bad_lines() {
        let err = parse_indications("ok\nbad | high").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse { line: 2, .. }));

        let err = parse_indications("[rumours]\nx").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse { line: 1, .. }));

        let err = parse_indications("x | 2.0").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = KnowledgeBase::from_files(None, None, Some(Path::new("/nonexistent/indications.txt")))
            .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Io { .. }));
    }
}
