//! Claim aggregation: fetch from every selected source concurrently, clean
//! and enrich the claims, and fold them into an
//! [`AnalysisResult`](factwatch_common::AnalysisResult).
//!
//! [`Aggregator::analyze`] always returns a result. When mock mode is on, or
//! the live pipeline errors or panics, it answers from [`mock`] data.
pub mod aggregator;
pub mod filters;
pub mod mock;

pub use aggregator::{build_result, Aggregator};
pub use mock::{mock_claims, mock_result};
