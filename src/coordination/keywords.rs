//! Case-insensitive keyword matching.

/// Whether any of `keywords` occurs in `text`, ignoring case.
pub fn is_relevant<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|k| lowered.contains(&k.as_ref().to_lowercase()))
}

/// A set of keywords, normalized to lowercase once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Match against text that is already lowercased.
    pub fn matches_lowered(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matches_lowered(&text.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant_ignores_case() {
        assert!(is_relevant("Found a BUG in checkout", &["bug"]));
        assert!(is_relevant("what about the roadmap", &["RoadMap"]));
        assert!(!is_relevant("looks good", &["bug", "typo"]));
    }

    #[test]
    fn test_is_relevant_is_substring_match() {
        // "log" matches inside "catalog"; this is plain substring matching.
        assert!(is_relevant("update the catalog", &["log"]));
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let empty: [&str; 0] = [];
        assert!(!is_relevant("anything", &empty));
        assert!(!KeywordSet::new([""]).matches("anything"));
        assert!(KeywordSet::new([""]).is_empty());
    }

    #[test]
    fn test_keyword_set_multiword() {
        let set = KeywordSet::new(["Big Picture", "can you check"]);
        assert!(set.matches("Let's zoom out to the big picture"));
        assert!(set.matches("Can you check the link?"));
        assert_eq!(set.as_slice()[0], "big picture");
    }
}
