//! Heuristic text analytics over claims.
//!
//! Everything here is a static table or regex scan: stem normalization, key
//! terms, region/entity/cluster counting, extractive summaries, and a couple
//! of helpers the source fetchers share (language guess, lexicon sentiment,
//! query expansion). All functions are pure; static tables are built once.
//!
//! ```
//! use factwatch_common::{Claim, Source};
//!
//! let claims = vec![
//!     Claim::new(Source::Telegram, "Обстріли Харкова тривають, обстріл посилився"),
//! ];
//! let terms = factwatch_nlp::extract_key_terms(&claims, 3);
//! assert_eq!(terms[0], "обстріл");
//! ```
pub mod alerts;
pub mod detect;
pub mod keyterms;
pub mod language;
pub mod normalize;
pub mod query;
mod rank;
pub mod sentiment;
pub mod summarize;

pub use alerts::detect_alerts;
pub use detect::{detect_clusters, extract_entities, extract_regions, first_region_mention};
pub use keyterms::{extract_key_terms, DEFAULT_KEY_TERM_COUNT};
pub use language::detect_language;
pub use normalize::{normalize_term, StemTable};
pub use query::enhance_query;
pub use sentiment::{analyze_sentiment, lexicon_sentiment};
pub use summarize::{summarize, summarize_with_mode};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NlpError {
    /// One surface form was claimed by two stems.
    #[error("form {form:?} maps to both {first:?} and {second:?}")]
    StemCollision {
        form: String,
        first: String,
        second: String,
    },
}
