use tracing::debug;

use super::types::Severity;
use crate::knowledge::KnowledgeBase;
use crate::TARGET_ENTITY;

/// Average descriptor count at or above which a record is considered severe.
pub const SEVERE_THRESHOLD: f64 = 2.5;

/// Average descriptor count at or above which a record is considered moderate.
pub const MODERATE_THRESHOLD: f64 = 1.5;

/// Maps matched symptoms to a severity label.
///
/// Only symptoms with a defined severity weight in the knowledge base contribute
/// to the average; if none does, the result is `Unknown`.
pub fn assess<I, S>(symptoms: I, kb: &KnowledgeBase) -> Severity
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut score = 0usize;
    let mut count = 0usize;

    for symptom in symptoms {
        if let Some(weight) = kb.symptom(symptom.as_ref()).and_then(|s| s.severity_weight()) {
            score += weight;
            count += 1;
        }
    }

    if count == 0 {
        return Severity::Unknown;
    }

    let average = score as f64 / count as f64;
    let severity = if average >= SEVERE_THRESHOLD {
        Severity::Severe
    } else if average >= MODERATE_THRESHOLD {
        Severity::Moderate
    } else {
        Severity::Mild
    };

    debug!(
        target: TARGET_ENTITY,
        "Severity {} from {} weighted symptoms (average {:.2})", severity, count, average
    );

    severity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Symptom;

    fn kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_symptom(Symptom::new("high").with_descriptors(["a", "b", "c"]));
        kb.add_symptom(Symptom::new("mid").with_descriptors(["a", "b"]));
        kb.add_symptom(Symptom::new("low").with_descriptors(["a"]));
        kb.add_symptom(Symptom::new("unweighted"));
        kb
    }

    #[test]
    fn maps_average_to_label() {
        let kb = kb();
        assert_eq!(assess(["high"], &kb), Severity::Severe);
        assert_eq!(assess(["mid"], &kb), Severity::Moderate);
        assert_eq!(assess(["low"], &kb), Severity::Mild);
        // (3 + 2) / 2 = 2.5
        assert_eq!(assess(["high", "mid"], &kb), Severity::Severe);
        // (2 + 1) / 2 = 1.5
        assert_eq!(assess(["mid", "low"], &kb), Severity::Moderate);
        // (1 + 1 + 2) / 3 < 1.5
        assert_eq!(assess(["low", "LOW", "mid"], &kb), Severity::Mild);
    }

    #[test]
    fn unweighted_and_unknown_symptoms_do_not_count() {
        let kb = kb();
        assert_eq!(assess(["unweighted"], &kb), Severity::Unknown);
        assert_eq!(assess(["not in kb"], &kb), Severity::Unknown);
        assert_eq!(assess(Vec::<String>::new(), &kb), Severity::Unknown);
        assert_eq!(assess(["unweighted", "high"], &kb), Severity::Severe);
    }
}
