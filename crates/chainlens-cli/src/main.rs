//! Command-line interface for chainlens
//!
//! Runs one query through the report pipeline, prints the report and writes
//! it to a Markdown file.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."          # or OPENAI_API_KEY (+ OPENAI_API_BASE)
//! cargo run --bin chainlens -- 請分析輝達的供應鏈風險 --data-dir data
//! ```
//!
//! Without credentials every generated section falls back to its rule-based
//! or raw form and the report is still produced.

use anyhow::Context;
use chainlens_core::AnalysisState;
use chainlens_llm::providers::{OpenAIConfig, OpenAIProvider};
use chainlens_llm::{ProviderGenerator, TextGenerator, UnavailableGenerator};
use chainlens_report::{
    FileKnowledgeStore, KnowledgeSources, PipelineStep, ReportConfig, ReportPipeline,
};
use chainlens_utils::{Config, LogFormat, init_tracing};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const DEFAULT_QUERY: &str =
    "請分析台積電 (TSMC) 的 2026 年展望，包含財務、法說會重點、新聞與供應鏈分析。";

#[derive(Parser, Debug)]
#[command(name = "chainlens", version)]
#[command(about = "Generate a supply-chain analysis report for a company", long_about = None)]
struct Args {
    /// Free-text query naming the company
    query: Vec<String>,

    /// Directory holding the JSON datasets
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Model used by the generation backend
    #[arg(long)]
    model: Option<String>,

    /// File the report is written to
    #[arg(short, long, default_value = "output_report.md")]
    output: PathBuf,

    /// Print the report without writing it
    #[arg(long)]
    no_save: bool,

    /// Log output format (pretty or json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn query(&self) -> String {
        if self.query.is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            self.query.join(" ")
        }
    }
}

/// Backend from the environment, or one that always fails when unconfigured
fn build_generator(config: &ReportConfig) -> Arc<dyn TextGenerator> {
    let provider = OpenAIConfig::from_env().and_then(|openai| {
        OpenAIProvider::with_config(openai.with_timeout(config.request_timeout.as_secs()))
    });

    match provider {
        Ok(provider) => {
            info!("Using {} at {}", config.model, provider.config().api_base);
            Arc::new(
                ProviderGenerator::new(Arc::new(provider), &config.model)
                    .with_max_tokens(config.max_tokens)
                    .with_retry_policy(config.retry_policy()),
            )
        }
        Err(e) => {
            warn!("Generation backend unavailable, using rule-based fallbacks: {}", e);
            Arc::new(UnavailableGenerator::new(e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let app = Config::from_env();
    init_tracing(args.log_format.unwrap_or(app.log_format))?;

    let mut config = ReportConfig::default().with_env();
    if let Some(dir) = &args.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    config.validate()?;

    info!("Starting {} ({})", app.app_name, app.environment);

    let store = FileKnowledgeStore::load(&config.data_dir)
        .await
        .with_context(|| format!("loading data from {}", config.data_dir.display()))?;
    let generator = build_generator(&config);
    let pipeline = ReportPipeline::new(&config, KnowledgeSources::from_store(Arc::new(store)), generator)?;

    let query = args.query();
    println!("Query: {query}\n");

    let started = Instant::now();
    let mut state = AnalysisState::new(&query);
    let mut current = Some(PipelineStep::Supervisor);
    while let Some(step) = current {
        if step != PipelineStep::Terminal {
            println!("▶ {step}");
        }
        state = pipeline.step(step, state).await?;
        if step == PipelineStep::Supervisor {
            println!("  company: {}", state.company_id().unwrap_or("?"));
        }
        current = step.next();
    }

    let report = ReportPipeline::final_report(&state)?;
    println!("\n{report}");
    println!("Completed in {:.1}s", started.elapsed().as_secs_f64());

    if !args.no_save {
        tokio::fs::write(&args.output, report)
            .await
            .with_context(|| format!("writing {}", args.output.display()))?;
        println!("Report saved to {}", args.output.display());
    }

    Ok(())
}
