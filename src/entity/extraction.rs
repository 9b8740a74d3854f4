use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use super::severity::assess;
use super::types::{DiseaseMatch, EntityAnnotation, Severity};
use crate::error::ExtractionError;
use crate::knowledge::KnowledgeBase;
use crate::news::NewsRecord;
use crate::TARGET_ENTITY;

/// Texts longer than this are rejected by `try_extract` rather than scanned.
pub const MAX_TEXT_BYTES: usize = 1 << 20;

lazy_static! {
    // Research compound codes such as "AB-123" or "XYZ1234".
    static ref COMPOUND_CODE: Regex =
        Regex::new(r"\b[A-Z]{2,3}-?\d{3,4}\b").expect("compound code pattern is valid");
}

/// Extract medical entities from `text`.
///
/// Never fails: text that cannot be analysed yields the empty annotation.
pub fn extract(text: &str, kb: &KnowledgeBase) -> EntityAnnotation {
    match try_extract(text, kb) {
        Ok(annotation) => annotation,
        Err(e) => {
            warn!(target: TARGET_ENTITY, "Entity extraction degraded to empty annotation: {}", e);
            EntityAnnotation::default()
        }
    }
}

/// Extract medical entities from `text`, reporting why a text could not be analysed.
///
/// Blank text is not an error; it simply has no medical information.
pub fn try_extract(text: &str, kb: &KnowledgeBase) -> Result<EntityAnnotation, ExtractionError> {
    if text.len() > MAX_TEXT_BYTES {
        return Err(ExtractionError::TextTooLarge { len: text.len() });
    }
    if text.contains('\0') {
        return Err(ExtractionError::InvalidText);
    }
    if text.trim().is_empty() {
        return Ok(EntityAnnotation::default());
    }

    let text_lower = text.to_lowercase();

    // 1. Diseases, one entry per disease however many of its keywords appear
    let mut seen_diseases = HashSet::new();
    let mut diseases = Vec::new();
    for (lowered, keyword, disease) in kb.disease_keywords() {
        if text_lower.contains(lowered) && seen_diseases.insert(disease.id.as_str()) {
            diseases.push(DiseaseMatch {
                id: disease.id.clone(),
                name: disease.name.clone(),
                matched_keyword: keyword.to_string(),
                reliability: disease.reliability,
            });
        }
    }

    // 2. Symptoms and lab indicators
    let symptoms: BTreeSet<String> = kb
        .symptoms()
        .iter()
        .filter(|s| text_lower.contains(&s.keyword.to_lowercase()))
        .map(|s| s.keyword.clone())
        .collect();
    let indicators = matching_terms(kb.indicators(), &text_lower).collect::<BTreeSet<_>>();

    // 3. Companies and drugs from the maintained lists
    let companies = matching_terms(kb.companies(), &text_lower).collect::<BTreeSet<_>>();
    let mut drugs = matching_terms(kb.drugs(), &text_lower).collect::<Vec<_>>();

    // 4. Compound codes the drug list does not know yet
    for code in COMPOUND_CODE.find_iter(text) {
        let code = code.as_str();
        if !drugs.iter().any(|d| d == code) {
            drugs.push(code.to_string());
        }
    }

    let has_medical_info = !diseases.is_empty() || !symptoms.is_empty() || !indicators.is_empty();

    let confidence = if diseases.is_empty() {
        0.0
    } else {
        diseases.iter().map(|d| d.reliability).sum::<f64>() / diseases.len() as f64
    };

    let severity = if has_medical_info {
        assess(&symptoms, kb)
    } else {
        Severity::Unknown
    };

    debug!(
        target: TARGET_ENTITY,
        "Extracted diseases={}, symptoms={}, indicators={}, companies={}, drugs={}, confidence={:.2}",
        diseases.len(), symptoms.len(), indicators.len(), companies.len(), drugs.len(), confidence
    );

    Ok(EntityAnnotation {
        diseases,
        symptoms,
        indicators,
        companies,
        drugs,
        has_medical_info,
        severity,
        confidence,
    })
}

/// Annotate a single record from its title, summary and content.
pub fn annotate(record: &NewsRecord, kb: &KnowledgeBase) -> EntityAnnotation {
    extract(&record.analysis_text(), kb)
}

/// Annotate every record; the result is index-aligned with `records`.
pub fn annotate_all(records: &[NewsRecord], kb: &KnowledgeBase) -> Vec<EntityAnnotation> {
    records.iter().map(|record| annotate(record, kb)).collect()
}

fn matching_terms<'a>(terms: &'a [String], text_lower: &'a str) -> impl Iterator<Item = String> + 'a {
    terms
        .iter()
        .filter(move |term| text_lower.contains(&term.to_lowercase()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Disease;
    use proptest::prelude::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin()
            .with_companies(["Pfizer", "AstraZeneca"])
            .with_drugs(["Keytruda", "AZD-1234"])
    }

    #[test]
    fn chinese_disease_keyword_is_found() {
        let annotation = extract("国产新药获批用于治疗肺癌", &kb());
        assert!(annotation.has_medical_info);
        assert_eq!(annotation.diseases.len(), 1);
        assert_eq!(annotation.diseases[0].name, "肺癌");
        assert_eq!(annotation.diseases[0].matched_keyword, "肺癌");
        assert_eq!(annotation.confidence, 0.95);
    }

    #[test]
    fn matching_is_case_insensitive_and_counts_once() {
        let annotation = extract("nsclc trial: NSCLC patients with Lung Cancer, nsclc again", &kb());
        assert_eq!(annotation.diseases.len(), 1);
        assert_eq!(annotation.diseases[0].id, "lung_cancer");
        assert_eq!(annotation.diseases[0].matched_keyword, "NSCLC");
    }

    #[test]
    fn empty_text_has_no_medical_info() {
        for text in ["", "   \n"] {
            let annotation = extract(text, &kb());
            assert_eq!(annotation, EntityAnnotation::default());
        }
    }

    #[test]
    fn confidence_is_disease_centric() {
        let annotation = extract("Patients reported fever and elevated HbA1c", &kb());
        assert!(annotation.has_medical_info);
        assert!(annotation.diseases.is_empty());
        assert_eq!(annotation.confidence, 0.0);
        assert!(annotation.symptoms.contains("fever"));
        assert!(annotation.indicators.contains("HbA1c"));
        assert_eq!(annotation.severity, Severity::Severe);
    }

    #[test]
    fn confidence_averages_reliabilities() {
        let annotation = extract("Hypertension raises lung cancer risk", &kb());
        assert_eq!(annotation.diseases.len(), 2);
        assert!((annotation.confidence - (0.95 + 0.9) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn compound_codes_are_appended_once() {
        let annotation = extract(
            "AstraZeneca doses AZD-1234 and XYZ5678; Keytruda combo. AB12 and ab-123 ignored, XYZ5678 again",
            &kb(),
        );
        assert_eq!(annotation.drugs, vec!["Keytruda", "AZD-1234", "XYZ5678"]);
        assert!(annotation.companies.contains("AstraZeneca"));
        // Drugs and companies alone are not medical information.
        assert!(!annotation.has_medical_info);
        assert_eq!(annotation.severity, Severity::Unknown);
    }

    #[test]
    fn oversized_and_nul_text_degrade() {
        let kb = kb();
        let big = "肺癌".repeat(MAX_TEXT_BYTES);
        assert!(matches!(try_extract(&big, &kb), Err(ExtractionError::TextTooLarge { .. })));
        assert_eq!(extract(&big, &kb), EntityAnnotation::default());
        assert_eq!(try_extract("肺癌\0", &kb), Err(ExtractionError::InvalidText));
    }

    #[test]
    fn shared_keyword_goes_to_first_disease() {
        let mut kb = KnowledgeBase::new();
        kb.add_disease(Disease::new("a", "A", 0.4).with_keywords(["tumour"])).unwrap();
        kb.add_disease(Disease::new("b", "B", 1.0).with_keywords(["tumour", "bone"])).unwrap();
        let annotation = extract("a tumour", &kb);
        assert_eq!(annotation.diseases.len(), 1);
        assert_eq!(annotation.diseases[0].id, "a");
    }

    #[test]
    fn annotate_reads_title_summary_and_content() {
        let record = NewsRecord::new("Trial update", "", "", "", None).with_content("乳腺癌 data");
        assert_eq!(annotate(&record, &kb()).diseases[0].id, "breast_cancer");
        assert_eq!(annotate_all(&[record.clone(), record], &kb()).len(), 2);
    }

    #[test]
    fn empty_summary_without_content_is_not_medical() {
        let record = NewsRecord::new("Quarterly results announced", "", "", "", None);
        let annotation = annotate(&record, &kb());
        assert!(!annotation.has_medical_info);
        assert_eq!(annotation.confidence, 0.0);
    }

    proptest! {
        #[test]
        fn confidence_is_bounded_and_extraction_repeatable(
            text in "(肺癌|NSCLC|fever|HbA1c|hypertension|AB-123|[a-z ]{0,8}){0,6}",
        ) {
            let kb = kb();
            let first = extract(&text, &kb);
            prop_assert!((0.0..=1.0).contains(&first.confidence));
            prop_assert_eq!(first, extract(&text, &kb));
        }
    }
}
