use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coarse severity derived from the symptoms found in a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    #[default]
    Unknown,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Mild => write!(f, "mild"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
            Severity::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Unknown,
        }
    }
}

/// A disease found in a text, with the keyword that triggered the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseMatch {
    pub id: String,
    pub name: String,
    pub matched_keyword: String,
    pub reliability: f64,
}

/// Medical entities found in one news record.
///
/// The default value is the "no medical info found" annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    pub diseases: Vec<DiseaseMatch>,
    pub symptoms: BTreeSet<String>,
    pub indicators: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    // Knowledge-base drugs first, then compound codes in order of appearance.
    pub drugs: Vec<String>,
    pub has_medical_info: bool,
    pub severity: Severity,
    pub confidence: f64,
}

impl EntityAnnotation {
    pub fn disease_names(&self) -> impl Iterator<Item = &str> {
        self.diseases.iter().map(|d| d.name.as_str())
    }
}
