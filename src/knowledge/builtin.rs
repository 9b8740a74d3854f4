use super::types::{Disease, KnowledgeBase, Symptom};

/// (id, name, reliability, keywords)
const DISEASES: &[(&str, &str, f64, &[&str])] = &[
    (
        "lung_cancer",
        "肺癌",
        0.95,
        &["肺癌", "肺部肿瘤", "非小细胞肺癌", "NSCLC", "lung cancer"],
    ),
    (
        "breast_cancer",
        "乳腺癌",
        0.95,
        &["乳腺癌", "乳房肿瘤", "乳腺肿瘤", "breast cancer"],
    ),
    (
        "hypertension",
        "高血压",
        0.9,
        &["高血压", "血压升高", "原发性高血压", "hypertension"],
    ),
    (
        "coronary_heart_disease",
        "冠心病",
        0.9,
        &["冠心病", "冠状动脉疾病", "心绞痛", "coronary heart disease", "angina"],
    ),
];

/// (keyword, severity descriptors)
const SYMPTOMS: &[(&str, &[&str])] = &[
    ("发热", &["低热", "中度发热", "高热"]),
    ("咳嗽", &["干咳", "咳痰"]),
    ("胸痛", &["隐痛", "刺痛", "压榨性疼痛"]),
    ("呼吸困难", &["活动后气短", "静息时气短", "端坐呼吸"]),
    ("乏力", &["轻度乏力"]),
    ("恶心", &[]),
    ("fever", &["low-grade", "moderate", "high-grade"]),
    ("cough", &["dry", "productive"]),
    ("chest pain", &["dull", "sharp", "crushing"]),
    ("shortness of breath", &["exertional", "at rest", "orthopnea"]),
    ("fatigue", &["mild"]),
    ("nausea", &[]),
];

const INDICATORS: &[&str] = &[
    "血压",
    "血糖",
    "肿瘤标志物",
    "糖化血红蛋白",
    "blood pressure",
    "blood glucose",
    "HbA1c",
    "PD-L1",
    "LDL cholesterol",
    "tumor marker",
];

impl KnowledgeBase {
    /// The bundled oncology and cardiovascular taxonomy with its symptom and lab tables.
    ///
    /// Company and drug lists are left empty; they come from the maintained files.
    pub fn builtin() -> Self {
        let mut kb = KnowledgeBase::new();
        for (id, name, reliability, keywords) in DISEASES {
            kb.add_disease(Disease::new(id, name, *reliability).with_keywords(keywords.iter()))
                .expect("bundled reliabilities are within [0, 1]");
        }
        for (keyword, descriptors) in SYMPTOMS {
            kb.add_symptom(Symptom::new(keyword).with_descriptors(descriptors.iter()));
        }
        for indicator in INDICATORS {
            kb.add_indicator(indicator);
        }
        kb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_taxonomy_is_indexed() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.diseases().len(), DISEASES.len());
        assert_eq!(kb.disease_by_keyword("非小细胞肺癌").unwrap().id, "lung_cancer");
        assert_eq!(kb.disease_by_keyword("Angina").unwrap().name, "冠心病");
        assert_eq!(kb.symptom("胸痛").and_then(|s| s.severity_weight()), Some(3));
        assert_eq!(kb.symptom("恶心").and_then(|s| s.severity_weight()), None);
        assert!(kb.indicators().iter().any(|i| i == "HbA1c"));
        assert!(kb.companies().is_empty());
    }

    #[test]
    fn bundled_diseases_are_valid() {
        let mut kb = KnowledgeBase::new();
        for (id, name, reliability, keywords) in DISEASES {
            let disease = Disease::new(id, name, *reliability).with_keywords(keywords.iter());
            assert!(kb.add_disease(disease).is_ok(), "{} rejected", id);
        }
    }
}
