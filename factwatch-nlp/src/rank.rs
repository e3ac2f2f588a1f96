use std::collections::HashMap;

/// Frequency table that remembers first-seen order, so ranking ties are stable.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub(crate) fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// Count-descending, first-seen order among equal counts, at most `n` entries.
    pub(crate) fn top(mut self, n: usize) -> Vec<(String, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(n);
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let mut t = Tally::default();
        for k in ["b", "a", "c", "a", "c"] {
            t.bump(k);
        }
        let top = t.top(3);
        assert_eq!(
            top,
            vec![("a".to_string(), 2), ("c".to_string(), 2), ("b".to_string(), 1)]
        );
    }
}
