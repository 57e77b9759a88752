//! Free-text answer grading.

/// Compare a submitted answer against the canonical one.
///
/// Both sides are trimmed and compared case-insensitively. There is no
/// partial credit and no fuzzy matching; internal whitespace is
/// significant. An empty submission is graded like any other string.
pub fn grade(submitted: &str, canonical: &str) -> bool {
    submitted.trim().to_lowercase() == canonical.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(grade("concentrate", "concentrate"));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert!(grade("Concentrate ", "concentrate"));
        assert!(grade("\tconcentrate\n", "  concentrate  "));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(grade("CONCENTRATE", "concentrate"));
        assert!(grade("ConCenTrate", "Concentrate"));
    }

    #[test]
    fn test_internal_whitespace_significant() {
        assert!(!grade("conc entrate", "concentrate"));
        assert!(!grade("ice  cream", "ice cream"));
    }

    #[test]
    fn test_wrong_answer() {
        assert!(!grade("meditate", "concentrate"));
    }

    #[test]
    fn test_empty_submission() {
        assert!(!grade("", "concentrate"));
        assert!(!grade("   ", "concentrate"));
        // Empty matches empty; creation-time validation keeps this out of
        // real card pools
        assert!(grade("", ""));
    }

    #[test]
    fn test_idempotent() {
        for _ in 0..3 {
            assert!(grade("Answer", "answer"));
            assert!(!grade("other", "answer"));
        }
    }
}
