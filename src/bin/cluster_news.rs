use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use medwire::clustering::DistanceMetric;
use medwire::config::EngineConfig;
use medwire::grouping::StrategyKind;
use medwire::logging::configure_logging;
use medwire::{ClusterResult, KnowledgeBase, NewsRecord, Pipeline, PipelineOptions, RawNewsRecord};
use prettytable::{Cell, Row as PrettyRow, Table};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Parser)]
#[clap(name = "cluster-news", about = "Deduplicate and cluster medical news records")]
struct Cli {
    /// JSON array of news records; reads stdin when omitted
    input: Option<PathBuf>,

    /// Company names, one per line
    #[clap(long)]
    companies: Option<PathBuf>,

    /// Drug names, one per line
    #[clap(long)]
    drugs: Option<PathBuf>,

    /// Disease, symptom and indicator sections
    #[clap(long)]
    indications: Option<PathBuf>,

    /// Only use the knowledge-base files, not the built-in taxonomy
    #[clap(long)]
    no_builtin: bool,

    /// pairwise or vector
    #[clap(short, long)]
    strategy: Option<StrategyKind>,

    #[clap(long)]
    title_threshold: Option<f64>,

    #[clap(long)]
    summary_threshold: Option<f64>,

    #[clap(long)]
    eps: Option<f64>,

    #[clap(long)]
    min_samples: Option<usize>,

    /// euclidean or cosine
    #[clap(long)]
    metric: Option<DistanceMetric>,

    /// Keep records without any disease, symptom or indicator
    #[clap(long)]
    all_records: bool,

    /// Drop records older than this many days
    #[clap(long)]
    max_age_days: Option<i64>,

    #[clap(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    #[clap(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env().context("invalid MEDWIRE_* environment")?;
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(value) = self.title_threshold {
            config.title_threshold = value;
        }
        if let Some(value) = self.summary_threshold {
            config.summary_threshold = value;
        }
        if let Some(value) = self.eps {
            config.eps = value;
        }
        if let Some(value) = self.min_samples {
            config.min_samples = value;
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }
        if self.all_records {
            config.require_medical_info = false;
        }
        if self.max_age_days.is_some() {
            config.max_age_days = self.max_age_days;
        }
        if self.companies.is_some() {
            config.companies_path = self.companies.clone();
        }
        if self.drugs.is_some() {
            config.drugs_path = self.drugs.clone();
        }
        if self.indications.is_some() {
            config.indications_path = self.indications.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_knowledge_base(config: &EngineConfig, no_builtin: bool) -> Result<KnowledgeBase> {
    let files = KnowledgeBase::from_files(
        config.companies_path.as_deref(),
        config.drugs_path.as_deref(),
        config.indications_path.as_deref(),
    )?;
    if no_builtin {
        return Ok(files);
    }
    let mut kb = KnowledgeBase::builtin();
    kb.merge(files)?;
    Ok(kb)
}

fn read_records(input: Option<&PathBuf>) -> Result<Vec<NewsRecord>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let raw: Vec<RawNewsRecord> = serde_json::from_str(&text).context("input is not a JSON array of records")?;
    Ok(raw.into_iter().map(NewsRecord::from).collect())
}

fn print_table(clusters: &[ClusterResult]) {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Title"),
        Cell::new("Sources"),
        Cell::new("Diseases"),
        Cell::new("Severity"),
        Cell::new("Confidence"),
    ]));

    for cluster in clusters {
        let diseases: Vec<&str> = cluster.cluster_indications.diseases.iter().map(String::as_str).collect();
        table.add_row(PrettyRow::new(vec![
            Cell::new(&cluster.main_title),
            Cell::new(&cluster.sources().join(", ")),
            Cell::new(&diseases.join(", ")),
            Cell::new(&cluster.main_indications.severity.to_string()),
            Cell::new(&format!("{:.2}", cluster.main_indications.confidence)),
        ]));
    }

    table.printstd();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(&cli.log_dir);

    let config = cli.engine_config()?;
    let kb = load_knowledge_base(&config, cli.no_builtin)?;
    let records = read_records(cli.input.as_ref())?;
    info!("Clustering {} records with the {} strategy", records.len(), config.strategy);

    let pipeline = Pipeline::new(kb, PipelineOptions::from(config));
    let output = pipeline.run(&records)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Table => {
            print_table(&output.clusters);
            println!(
                "{} records in, {} kept, {} with medical info, {} clusters, {} noise",
                output.stats.input,
                output.stats.kept,
                output.stats.with_medical_info,
                output.stats.clusters,
                output.stats.noise
            );
        }
    }

    Ok(())
}
