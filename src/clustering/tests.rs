use proptest::prelude::*;
use std::collections::BTreeSet;

use super::*;
use crate::entity::{DiseaseMatch, EntityAnnotation};
use crate::error::{AggregateError, ClusterError, ConfigError};
use crate::grouping::GroupingStrategy;
use crate::news::NewsRecord;

fn record(title: &str, summary: &str) -> NewsRecord {
    NewsRecord::new(title, summary, "https://news.example/item", "wire", None)
}

fn annotation(confidence: f64, disease: &str) -> EntityAnnotation {
    EntityAnnotation {
        diseases: vec![DiseaseMatch {
            id: disease.to_lowercase(),
            name: disease.to_string(),
            matched_keyword: disease.to_string(),
            reliability: confidence,
        }],
        has_medical_info: true,
        confidence,
        ..EntityAnnotation::default()
    }
}

fn member_titles(clustering: &Clustering, records: &[NewsRecord]) -> BTreeSet<BTreeSet<String>> {
    clustering
        .iter()
        .filter(|&(&label, _)| label != NOISE_LABEL)
        .map(|(_, members)| members.iter().map(|&i| records[i].title.clone()).collect())
        .collect()
}

#[test]
fn unrelated_records_are_all_noise() {
    let records = vec![
        record("Pfizer reports quarterly earnings", "Revenue beat analyst forecasts"),
        record("Hospital opens pediatric wing", "Construction finished ahead of schedule"),
        record("Vaccine storage guidance updated", "Freezers must hold colder temperatures"),
    ];
    let clustering = cluster(&records, 0.3, 2).unwrap();
    assert_eq!(clustering.len(), 1);
    assert_eq!(clustering[&NOISE_LABEL], vec![0, 1, 2]);

    let annotations = vec![EntityAnnotation::default(); 3];
    assert!(aggregate(&clustering, &records, &annotations).unwrap().is_empty());
}

#[test]
fn repeated_stories_form_clusters() {
    let records = vec![
        record("FDA approves Keytruda for lung cancer", "First line NSCLC therapy cleared"),
        record("Hospital opens pediatric wing", "Construction finished ahead of schedule"),
        record("FDA approves Keytruda for lung cancer", "First line NSCLC therapy cleared"),
        record("FDA approves Keytruda for lung cancer", "First line NSCLC therapy cleared"),
    ];
    let clustering = cluster(&records, 0.3, 2).unwrap();
    assert_eq!(clustering[&0], vec![0, 2, 3]);
    assert_eq!(clustering[&NOISE_LABEL], vec![1]);
}

#[test]
fn stop_word_corpus_is_degenerate_not_an_error() {
    let records = vec![record("The", "of and"), record("A", "it is"), record("", "")];
    let clustering = cluster(&records, 0.3, 2).unwrap();
    assert_eq!(clustering.len(), 1);
    assert_eq!(clustering[&NOISE_LABEL], vec![0, 1, 2]);
}

#[test]
fn stop_word_documents_cluster_together_in_a_mixed_corpus() {
    let records = vec![
        record("The of and", ""),
        record("A it is", ""),
        record("It was the", ""),
        record("Lung cancer drug approved today", ""),
    ];
    let clustering = cluster(&records, 0.3, 2).unwrap();
    assert_eq!(clustering[&0], vec![0, 1, 2]);
    assert_eq!(clustering[&NOISE_LABEL], vec![3]);

    // Cosine distance is undefined for zero vectors.
    let cosine = VectorClusterer::new(0.3, 2)
        .unwrap()
        .with_metric(DistanceMetric::Cosine);
    assert_eq!(cosine.cluster(&records).unwrap()[&NOISE_LABEL], vec![0, 1, 2, 3]);
}

#[test]
fn empty_input_gives_empty_clustering() {
    assert!(cluster(&[], 0.3, 2).unwrap().is_empty());
}

#[test]
fn invalid_parameters_fail_fast() {
    let records = vec![record("a title", "a summary")];
    assert_eq!(
        cluster(&records, -0.3, 2),
        Err(ClusterError::Config(ConfigError::InvalidEps(-0.3)))
    );
    assert_eq!(
        cluster(&records, 0.3, 0),
        Err(ClusterError::Config(ConfigError::InvalidMinSamples))
    );
    assert!(cluster(&records, f64::NAN, 2).is_err());
}

#[test]
fn clustering_is_deterministic_and_order_independent() {
    let stories = [
        ("Merck acquires biotech startup", "Deal values oncology pipeline"),
        ("Measles outbreak spreads in county", "Health officials urge vaccination"),
    ];
    let mut records: Vec<NewsRecord> = Vec::new();
    for (title, summary) in stories {
        for _ in 0..3 {
            records.push(record(title, summary));
        }
    }
    records.push(record("Quarterly earnings call scheduled", "Investors await guidance"));

    let first = cluster(&records, 0.3, 2).unwrap();
    assert_eq!(first, cluster(&records, 0.3, 2).unwrap());

    let reversed: Vec<NewsRecord> = records.iter().rev().cloned().collect();
    assert_eq!(
        member_titles(&first, &records),
        member_titles(&cluster(&reversed, 0.3, 2).unwrap(), &reversed)
    );
}

#[test]
fn cosine_metric_matches_euclidean_on_unit_vectors() {
    let records = vec![
        record("Gene therapy trial succeeds", "Rare disease patients improve"),
        record("Gene therapy trial succeeds", "Rare disease patients improve"),
        record("Gene therapy trial succeeds", "Rare disease patients improve"),
        record("Insulin prices cut", "Manufacturer lowers list price"),
    ];
    let cosine = VectorClusterer::new(0.3, 2)
        .unwrap()
        .with_metric(DistanceMetric::Cosine);
    assert_eq!(cosine.cluster(&records).unwrap(), cluster(&records, 0.3, 2).unwrap());
    assert_eq!(cosine.name(), "vector");
    assert_eq!(cosine.assign(&records).unwrap()[&0], vec![0, 1, 2]);
}

#[test]
fn aggregate_orders_by_confidence_then_size() {
    let records: Vec<NewsRecord> = (0..6).map(|i| record(&format!("story {}", i), "")).collect();
    let annotations = vec![
        annotation(0.5, "Hypertension"),
        annotation(0.9, "Lung cancer"),
        annotation(0.5, "Hypertension"),
        annotation(0.5, "Asthma"),
        annotation(0.1, "Flu"),
        annotation(0.5, "Asthma"),
    ];
    let clustering = Clustering::from([
        (0, vec![0]),
        (1, vec![4, 1]),
        (2, vec![3, 2, 5]),
        (NOISE_LABEL, vec![]),
    ]);

    let results = aggregate(&clustering, &records, &annotations).unwrap();
    let labels: Vec<i32> = results.iter().map(|r| r.label).collect();
    assert_eq!(labels, vec![1, 2, 0]);

    assert_eq!(results[0].main_title, "story 1");
    assert_eq!(results[0].similar_items[0].title, "story 4");
    assert_eq!(results[1].main_title, "story 2");
    assert_eq!(results[1].size(), 3);
    assert_eq!(
        results[1].cluster_indications.diseases,
        BTreeSet::from(["Asthma".to_string(), "Hypertension".to_string()])
    );
}

#[test]
fn aggregate_equal_confidence_and_size_keeps_label_order() {
    let records: Vec<NewsRecord> = (0..2).map(|i| record(&format!("story {}", i), "")).collect();
    let annotations = vec![EntityAnnotation::default(); 2];
    let clustering = Clustering::from([(3, vec![1]), (7, vec![0])]);
    let results = aggregate(&clustering, &records, &annotations).unwrap();
    assert_eq!(results.iter().map(|r| r.label).collect::<Vec<_>>(), vec![3, 7]);
}

#[test]
fn aggregate_rejects_inconsistent_input() {
    let records = vec![record("a", "b")];
    assert_eq!(
        aggregate(&Clustering::new(), &records, &[]),
        Err(AggregateError::LengthMismatch {
            records: 1,
            annotations: 0
        })
    );
    let clustering = Clustering::from([(0, vec![0, 5])]);
    assert_eq!(
        aggregate(&clustering, &records, &[EntityAnnotation::default()]),
        Err(AggregateError::IndexOutOfRange {
            label: 0,
            index: 5,
            len: 1
        })
    );
}

proptest! {
    #[test]
    fn noise_never_reaches_results(labels in prop::collection::vec(-1i32..4, 0..20)) {
        let records: Vec<NewsRecord> = (0..labels.len())
            .map(|i| record(&format!("record {}", i), "summary"))
            .collect();
        let annotations = vec![EntityAnnotation::default(); records.len()];
        let clustering = labels_to_clustering(&labels);
        let results = aggregate(&clustering, &records, &annotations).unwrap();

        let noise: BTreeSet<String> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == NOISE_LABEL)
            .map(|(i, _)| records[i].title.clone())
            .collect();

        let mut seen = 0;
        for result in &results {
            prop_assert!(!noise.contains(&result.main_title));
            for item in &result.similar_items {
                prop_assert!(!noise.contains(&item.title));
            }
            seen += result.size();
        }
        prop_assert_eq!(seen, labels.len() - noise.len());
    }
}
