//! Free-text search filters for list endpoints.

/// Longest accepted search string.
pub const SEARCH_MAX: usize = 100;

/// Case-insensitive substring filter.
///
/// Blank input means "no filter" and yields `None` from [`SearchTerm::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim the raw query value, truncating overly long input.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.chars().take(SEARCH_MAX).collect()))
    }

    /// Borrow the trimmed term.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern with the term's own wildcards escaped.
    ///
    /// # Examples
    /// ```
    /// use medicare_backend::domain::SearchTerm;
    ///
    /// let term = SearchTerm::parse(Some("50%_off")).unwrap();
    /// assert_eq!(term.like_pattern(), r"%50\%\_off%");
    /// ```
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// In-process equivalent of the `ILIKE` match.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_input_is_no_filter(#[case] raw: Option<&str>) {
        assert!(SearchTerm::parse(raw).is_none());
    }

    #[rstest]
    fn long_input_is_truncated() {
        let raw = "a".repeat(SEARCH_MAX + 20);
        let term = SearchTerm::parse(Some(&raw)).expect("term");
        assert_eq!(term.as_str().chars().count(), SEARCH_MAX);
    }

    #[rstest]
    fn matches_ignores_case() {
        let term = SearchTerm::parse(Some("wkr-00")).expect("term");
        assert!(term.matches("WKR-000001"));
        assert!(!term.matches("Amina"));
    }
}
