//! Twitter/X fetching in three flavours: the v2 recent-search API, scraping the
//! public search page, or a proxy service that returns ready-made claims.
pub mod client;
pub mod extract;
pub mod scrape;
mod source;
pub mod types;

pub use client::TwitterApi;
pub use scrape::TwitterScraper;
pub use source::TwitterSource;
