//! End-to-end pipeline: config -> domain trees -> base set -> oracle ->
//! results matrix -> concise test set.
use std::path::Path;

use feat_concise::cover::{minimize_with_report, CoverReport};
use feat_concise::outcome::ImplementationId;
use feat_explore::base::{generate_base, BaseSet, GenerateOptions};
use feat_explore::GenerateError;
use feat_ir::config::{ConfigError, ConfigFile};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::oracle::{collect_results, Oracle};

/// Exhaustive products above this size are logged as a warning.
const LARGE_PRODUCT_WARN: usize = 100_000;

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("reference implementation '{0}' is also listed as a candidate")]
    ReferenceIsCandidate(ImplementationId),
}

/// Summary of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub func_name: String,
    /// Size of the deduplicated base set.
    pub base_size: usize,
    /// How many base cases came from the exhaustive product.
    pub exhaustive_count: usize,
    pub cover: CoverReport,
}

impl CampaignReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse the config's specs and generate its base set.
pub fn base_set(config: &ConfigFile) -> Result<BaseSet, CampaignError> {
    let nodes = config.nodes()?;
    let options = GenerateOptions {
        random_count: config.num_random,
        seed: config.seed,
    };
    let base = generate_base(&nodes, options)?;
    if base.exhaustive_count() > LARGE_PRODUCT_WARN {
        warn!(
            func = %config.func_name,
            exhaustive = base.exhaustive_count(),
            "large exhaustive product, oracle runs will be slow"
        );
    }
    Ok(base)
}

/// Run the whole pipeline and return the concise test set with its report.
pub fn generate_tests<O: Oracle + ?Sized>(
    config: &ConfigFile,
    oracle: &O,
    reference: &ImplementationId,
    candidates: &[ImplementationId],
) -> Result<CampaignReport, CampaignError> {
    if candidates.contains(reference) {
        return Err(CampaignError::ReferenceIsCandidate(reference.clone()));
    }

    let base = base_set(config)?;
    let results = collect_results(oracle, base.cases(), reference, candidates);
    let cover = minimize_with_report(&results);

    info!(
        func = %config.func_name,
        base = base.len(),
        selected = cover.selected.len(),
        "campaign complete"
    );

    Ok(CampaignReport {
        func_name: config.func_name.clone(),
        base_size: base.len(),
        exhaustive_count: base.exhaustive_count(),
        cover,
    })
}

/// [`generate_tests`] for a config file on disk.
pub fn generate_tests_from_path<O: Oracle + ?Sized>(
    path: impl AsRef<Path>,
    oracle: &O,
    reference: &ImplementationId,
    candidates: &[ImplementationId],
) -> Result<CampaignReport, CampaignError> {
    let config = ConfigFile::load(path)?;
    generate_tests(&config, oracle, reference, candidates)
}
