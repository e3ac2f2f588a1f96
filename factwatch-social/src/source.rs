use async_trait::async_trait;
use factwatch_common::{Claim, Source};

/// A platform the aggregator can pull claims from.
#[async_trait]
pub trait ClaimSource: Send + Sync {
    fn source(&self) -> Source;

    /// Fetch up to `limit` claims matching `query`.
    async fn fetch(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Claim>>;
}

/// First `max` characters of `text`, with `...` when something was cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("Харків", 10), "Харків");
        assert_eq!(preview("Харків", 3), "Хар...");
    }
}
