//! Fixed-sequence report pipeline

use crate::agents::{
    EarningsCallStage, FinancialStage, NewsStage, QueryResolver, SupervisorStage,
    SupplyChainStage,
};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::report::ReportSynthesizer;
use crate::store::KnowledgeSources;
use chainlens_core::{AnalysisState, Stage};
use chainlens_llm::TextGenerator;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Pipeline transitions in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    Supervisor,
    Financial,
    EarningsCall,
    News,
    SupplyChain,
    Reporter,
    /// Extracts the final report; runs no stage
    Terminal,
}

impl PipelineStep {
    /// Every stage-running step, in order
    pub const STAGES: [PipelineStep; 6] = [
        Self::Supervisor,
        Self::Financial,
        Self::EarningsCall,
        Self::News,
        Self::SupplyChain,
        Self::Reporter,
    ];

    /// Step that follows this one, `None` after the terminal step
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Supervisor => Some(Self::Financial),
            Self::Financial => Some(Self::EarningsCall),
            Self::EarningsCall => Some(Self::News),
            Self::News => Some(Self::SupplyChain),
            Self::SupplyChain => Some(Self::Reporter),
            Self::Reporter => Some(Self::Terminal),
            Self::Terminal => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::Financial => "financial",
            Self::EarningsCall => "earnings_call",
            Self::News => "news",
            Self::SupplyChain => "supply_chain",
            Self::Reporter => "reporter",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs the six stages in order over one analysis state
///
/// The pipeline holds no per-run data; each call to [`ReportPipeline::run`]
/// starts from a fresh state, so concurrent runs do not interfere.
pub struct ReportPipeline {
    supervisor: Arc<dyn Stage>,
    financial: Arc<dyn Stage>,
    earnings_call: Arc<dyn Stage>,
    news: Arc<dyn Stage>,
    supply_chain: Arc<dyn Stage>,
    reporter: Arc<dyn Stage>,
}

impl ReportPipeline {
    /// Wire the standard stages to the given sources and backend
    pub fn new(
        config: &ReportConfig,
        sources: KnowledgeSources,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        let resolver = QueryResolver::new(config.default_company_id.clone())?;

        Ok(Self {
            supervisor: Arc::new(SupervisorStage::new(resolver, sources.graph.clone())),
            financial: Arc::new(FinancialStage::new(sources.financial)),
            earnings_call: Arc::new(EarningsCallStage::new(
                sources.earnings_calls,
                config.earnings_call_limit,
            )),
            news: Arc::new(NewsStage::new(sources.news, config.news_limit)),
            supply_chain: Arc::new(SupplyChainStage::new(
                sources.graph,
                generator.clone(),
                config.supply_chain_temperature,
            )),
            reporter: Arc::new(
                ReportSynthesizer::new(sources.quarterly, generator).with_temperatures(
                    config.key_points_temperature,
                    config.news_highlights_temperature,
                ),
            ),
        })
    }

    /// Replace the stage run at `step`; the terminal step has no stage
    pub fn with_stage(mut self, step: PipelineStep, stage: Arc<dyn Stage>) -> Self {
        match step {
            PipelineStep::Supervisor => self.supervisor = stage,
            PipelineStep::Financial => self.financial = stage,
            PipelineStep::EarningsCall => self.earnings_call = stage,
            PipelineStep::News => self.news = stage,
            PipelineStep::SupplyChain => self.supply_chain = stage,
            PipelineStep::Reporter => self.reporter = stage,
            PipelineStep::Terminal => {}
        }
        self
    }

    fn stage(&self, step: PipelineStep) -> Option<&dyn Stage> {
        let stage = match step {
            PipelineStep::Supervisor => &self.supervisor,
            PipelineStep::Financial => &self.financial,
            PipelineStep::EarningsCall => &self.earnings_call,
            PipelineStep::News => &self.news,
            PipelineStep::SupplyChain => &self.supply_chain,
            PipelineStep::Reporter => &self.reporter,
            PipelineStep::Terminal => return None,
        };
        Some(stage.as_ref())
    }

    /// Run one step and merge its fragment into `state`
    ///
    /// The terminal step returns the state unchanged.
    pub async fn step(&self, step: PipelineStep, state: AnalysisState) -> Result<AnalysisState> {
        let Some(stage) = self.stage(step) else {
            return Ok(state);
        };

        let started = Instant::now();
        let update = stage.run(&state).await;
        debug!("Stage {} wrote {:?}", stage.name(), update.fields());
        let state = state.merge(update)?;

        info!(
            step = step.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Step completed"
        );
        Ok(state)
    }

    /// Run every stage for `query` and return the final state
    ///
    /// Fails with [`ReportError::MissingReport`] when the terminal step finds
    /// no report, or with a state error if a stage wrote outside its fields.
    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self, query: &str) -> Result<AnalysisState> {
        info!("Starting report pipeline");
        let started = Instant::now();

        let mut state = AnalysisState::new(query);
        let mut current = Some(PipelineStep::Supervisor);
        while let Some(step) = current {
            state = self.step(step, state).await?;
            current = step.next();
        }

        Self::final_report(&state)?;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Report pipeline finished"
        );
        Ok(state)
    }

    /// Run the pipeline and return only the report text
    pub async fn generate_report(&self, query: &str) -> Result<String> {
        let state = self.run(query).await?;
        Self::final_report(&state).map(str::to_string)
    }

    /// Report written by the terminal stage
    pub fn final_report(state: &AnalysisState) -> Result<&str> {
        state.final_report().ok_or(ReportError::MissingReport)
    }
}
