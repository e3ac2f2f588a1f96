//! Claim sources: per-platform fetchers that turn posts into [`Claim`]s.
//!
//! Every fetcher implements [`ClaimSource`]. Fetch errors are returned to the
//! caller, which decides whether a failed source is fatal (the aggregator
//! treats it as zero claims).
//!
//! [`Claim`]: factwatch_common::Claim
pub mod classify;
pub mod source;
pub mod telegram;
pub mod twitter;

pub use source::ClaimSource;
pub use telegram::TelegramSource;
pub use twitter::TwitterSource;
