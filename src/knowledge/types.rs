use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ConfigError;
use crate::TARGET_KNOWLEDGE;

/// A disease entry: display name, match keywords and a reliability weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: String,
    pub name: String,
    /// Match keywords in declaration order, without duplicates.
    pub keywords: Vec<String>,
    pub reliability: f64,
}

impl Disease {
    pub fn new(id: &str, name: &str, reliability: f64) -> Self {
        Disease {
            id: id.to_string(),
            name: name.to_string(),
            keywords: Vec::new(),
            reliability,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !self.keywords.iter().any(|k| k == keyword) {
                self.keywords.push(keyword.to_string());
            }
        }
        self
    }

    /// Id derived from a display name: lowercase, whitespace collapsed to `_`.
    pub fn id_from_name(name: &str) -> String {
        name.split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// A symptom keyword and the severity descriptors attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub keyword: String,
    pub severity_descriptors: Vec<String>,
}

impl Symptom {
    pub fn new(keyword: &str) -> Self {
        Symptom {
            keyword: keyword.trim().to_string(),
            severity_descriptors: Vec::new(),
        }
    }

    pub fn with_descriptors<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.severity_descriptors.extend(
            descriptors
                .into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty()),
        );
        self
    }

    /// Ordinal severity weight: the number of descriptors, undefined when there are none.
    pub fn severity_weight(&self) -> Option<usize> {
        match self.severity_descriptors.len() {
            0 => None,
            n => Some(n),
        }
    }
}

/// Keyword collections the extractor matches against.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    companies: Vec<String>,
    drugs: Vec<String>,
    diseases: Vec<Disease>,
    // (lowercased keyword, keyword as declared, index into `diseases`) in declaration order.
    disease_keywords: Vec<(String, String, usize)>,
    disease_index: HashMap<String, usize>,
    symptoms: Vec<Symptom>,
    symptom_index: HashMap<String, usize>,
    indicators: Vec<String>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_disease(&mut self, disease: Disease) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&disease.reliability) {
            return Err(ConfigError::InvalidReliability {
                disease: disease.name.clone(),
                value: disease.reliability,
            });
        }

        let idx = match self.diseases.iter().position(|d| d.id == disease.id) {
            Some(existing) => {
                // Same id: fold the new keywords into the existing entry.
                let merged = self.diseases[existing]
                    .clone()
                    .with_keywords(&disease.keywords);
                self.diseases[existing] = merged;
                existing
            }
            None => {
                self.diseases.push(disease);
                self.diseases.len() - 1
            }
        };

        let keywords = self.diseases[idx].keywords.clone();
        for keyword in keywords {
            let lowered = keyword.to_lowercase();
            if let Some(&owner) = self.disease_index.get(&lowered) {
                if owner != idx {
                    debug!(
                        target: TARGET_KNOWLEDGE,
                        "Keyword '{}' already maps to '{}', ignoring for '{}'",
                        keyword, self.diseases[owner].name, self.diseases[idx].name
                    );
                }
                continue;
            }
            self.disease_index.insert(lowered.clone(), idx);
            self.disease_keywords.push((lowered, keyword, idx));
        }

        Ok(())
    }

    pub fn add_symptom(&mut self, symptom: Symptom) {
        if symptom.keyword.is_empty() {
            return;
        }
        let lowered = symptom.keyword.to_lowercase();
        match self.symptom_index.get(&lowered) {
            Some(&idx) => {
                if self.symptoms[idx].severity_descriptors.is_empty() {
                    self.symptoms[idx].severity_descriptors = symptom.severity_descriptors;
                }
            }
            None => {
                self.symptom_index.insert(lowered, self.symptoms.len());
                self.symptoms.push(symptom);
            }
        }
    }

    pub fn add_indicator(&mut self, keyword: &str) {
        push_unique(&mut self.indicators, keyword);
    }

    pub fn add_company(&mut self, name: &str) {
        push_unique(&mut self.companies, name);
    }

    pub fn add_drug(&mut self, name: &str) {
        push_unique(&mut self.drugs, name);
    }

    pub fn with_companies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_company(name.as_ref());
        }
        self
    }

    pub fn with_drugs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_drug(name.as_ref());
        }
        self
    }

    /// Folds `other` into `self`; entries already present keep their first definition.
    pub fn merge(&mut self, other: KnowledgeBase) -> Result<(), ConfigError> {
        for disease in other.diseases {
            self.add_disease(disease)?;
        }
        for symptom in other.symptoms {
            self.add_symptom(symptom);
        }
        for indicator in &other.indicators {
            self.add_indicator(indicator);
        }
        for company in &other.companies {
            self.add_company(company);
        }
        for drug in &other.drugs {
            self.add_drug(drug);
        }
        Ok(())
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    /// `(lowercased, declared)` disease keywords with their owning disease, in declaration order.
    pub fn disease_keywords(&self) -> impl Iterator<Item = (&str, &str, &Disease)> {
        self.disease_keywords.iter().map(move |(lowered, keyword, idx)| {
            (lowered.as_str(), keyword.as_str(), &self.diseases[*idx])
        })
    }

    pub fn disease_by_keyword(&self, keyword: &str) -> Option<&Disease> {
        self.disease_index
            .get(&keyword.to_lowercase())
            .map(|&idx| &self.diseases[idx])
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn symptom(&self, keyword: &str) -> Option<&Symptom> {
        self.symptom_index
            .get(&keyword.to_lowercase())
            .map(|&idx| &self.symptoms[idx])
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn drugs(&self) -> &[String] {
        &self.drugs
    }

    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
            && self.symptoms.is_empty()
            && self.indicators.is_empty()
            && self.companies.is_empty()
            && self.drugs.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
