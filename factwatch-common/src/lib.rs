//! Common types and utilities shared across factwatch crates.
//!
//! This crate defines the claim data model, the analysis configuration schema,
//! observability helpers, and the shared error type. It stays light on
//! dependencies so every other crate can depend on it.
//!
//! # Overview
//!
//! - [`Claim`] and [`AnalysisResult`]: the data flowing from fetchers to the dashboard
//! - [`analysis::AnalysisConfig`]: versioned knobs for one aggregation run
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`FactwatchError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use factwatch_common::analysis::{AnalysisConfig, SummaryMode};
//!
//! let cfg = AnalysisConfig::default();
//! assert_eq!(cfg.nlp.models.summary_model, SummaryMode::Extractive);
//! assert_eq!(cfg.nlp.parameters.summary_length, 150);
//! ```
pub mod analysis;
pub mod model;
pub mod observability;

pub use model::{
    clamp_relevance, count_categories, count_sources, Alert, AlertSeverity, AnalysisResult,
    Claim, Cluster, ClusterCounts, ClusterType, EntitySummary, Sentiment, SentimentBreakdown,
    Source, SourceCategory,
};

/// Error types used across factwatch.
#[derive(thiserror::Error, Debug)]
pub enum FactwatchError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source fetcher failed to produce claims.
    #[error("Source error ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    /// An LLM provider call failed or returned something unusable.
    #[error("LLM error: {0}")]
    Llm(String),

    /// A response body could not be decoded into the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Anything else bubbling up from lower layers.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`FactwatchError`].
pub type Result<T> = std::result::Result<T, FactwatchError>;
