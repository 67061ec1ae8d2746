use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Type-ahead matching of protocol names using nucleo-matcher
pub struct NameFilter {
    matcher: Matcher,
}

impl NameFilter {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Indices of `names` matching `query`, best score first.
    /// Equal scores keep their original order; an empty query keeps everything.
    pub fn rank<S: AsRef<str>>(&mut self, query: &str, names: &[S]) -> Vec<usize> {
        if query.trim().is_empty() {
            return (0..names.len()).collect();
        }

        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(usize, u32)> = names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let haystack = Utf32String::from(name.as_ref());
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (idx, score))
            })
            .collect();

        // Stable sort keeps display order among ties
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(idx, _)| idx).collect()
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new()
    }
}
