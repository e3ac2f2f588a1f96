//! LLM-backed fact checking for single posts.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, OpenAI and
//! Perplexity chat-completions clients, and the [`FactChecker`] flow that
//! extracts claims with one model and verifies them with the other. Without
//! both keys the checker answers from canned demo data.
//!
//! # Examples
//! ```
//! use factwatch_llm::{FactChecker, TruthValue};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let checker = FactChecker::demo();
//! let report = checker.check("New climate data was published today").await;
//! assert!(report.demo);
//! assert_eq!(report.verdicts[1].truth_value, TruthValue::DefinitelyFalse);
//! # }
//! ```
mod chat;
pub mod demo;
pub mod factcheck;
pub mod openai;
pub mod parse;
pub mod perplexity;
pub mod traits;
pub mod verdict;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use factcheck::FactChecker;
pub use openai::OpenAiClient;
pub use perplexity::PerplexityClient;
pub use traits::{LlmClient, LlmResponse};
pub use verdict::{FactCheckReport, ScoredVerdict, TruthValue, Verdict};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_PERPLEXITY_MODEL: &str = "sonar";
