use std::collections::HashMap;

use crate::models::{ActivationMethod, PackagePolicy};

/// Candidate codes for a knowledge-base lookup, most specific first: the
/// code as given, then each form produced by stripping one trailing decimal
/// digit at a time. Certificates carry unit sequence numbers appended to a
/// base package code, and callers rarely know the canonical root.
pub fn code_candidates(code: &str) -> Vec<String> {
    let code = code.trim();
    if code.is_empty() {
        return vec![];
    }

    let mut candidates = vec![code.to_string()];
    let mut current = code;
    while current.ends_with(|c: char| c.is_ascii_digit()) {
        current = &current[..current.len() - 1];
        if current.is_empty() {
            break;
        }
        candidates.push(current.to_string());
    }
    candidates
}

/// Deposit policy per package family. Package descriptions live in the
/// voice platform's own knowledge base; this table carries only what the
/// status engine needs.
pub struct KnowledgeBase {
    packages: HashMap<String, PackagePolicy>,
}

impl KnowledgeBase {
    pub fn new(packages: HashMap<String, PackagePolicy>) -> Self {
        let packages = packages
            .into_iter()
            .map(|(code, policy)| (code.to_uppercase(), policy))
            .collect();
        Self { packages }
    }

    pub fn builtin() -> Self {
        let mut packages = HashMap::new();

        let mut family = |codes: &[&str], expected_deposit: f64, activation: ActivationMethod| {
            for code in codes {
                packages.insert(
                    code.to_string(),
                    PackagePolicy {
                        expected_deposit,
                        activation,
                    },
                );
            }
        };

        family(&["ECF", "ECFWIN"], 500.0, ActivationMethod::Online);
        family(&["E", "E7", "E78", "E789"], 500.0, ActivationMethod::Online);
        family(
            &["BEACH", "BEACH1", "BEACH12", "BEACH123"],
            750.0,
            ActivationMethod::Online,
        );
        family(
            &["SKI", "SKI5", "SKI55", "SKI555"],
            800.0,
            ActivationMethod::Mail,
        );

        Self { packages }
    }

    /// First candidate with a policy entry wins; returns the matched code
    /// alongside the policy so callers can report what actually resolved.
    pub fn resolve(&self, code: &str) -> Option<(String, PackagePolicy)> {
        for candidate in code_candidates(code) {
            let key = candidate.to_uppercase();
            if let Some(policy) = self.packages.get(&key) {
                return Some((key, *policy));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_most_specific_first() {
        let candidates = code_candidates("BEACH123");
        assert_eq!(candidates, ["BEACH123", "BEACH12", "BEACH1", "BEACH"]);
    }

    #[test]
    fn test_candidate_count_matches_trailing_digits() {
        // k trailing digits on a lettered root -> k + 1 candidates,
        // strictly decreasing in length, first equal to the input.
        for (code, k) in [("SKI555", 3), ("E7", 1), ("ECFWIN", 0), ("A1234", 4)] {
            let candidates = code_candidates(code);
            assert_eq!(candidates.len(), k + 1, "code {code}");
            assert_eq!(candidates[0], code);
            for pair in candidates.windows(2) {
                assert!(pair[0].len() > pair[1].len());
            }
        }
    }

    #[test]
    fn test_no_trailing_digits_yields_single_candidate() {
        assert_eq!(code_candidates("BEACH"), ["BEACH"]);
    }

    #[test]
    fn test_empty_code_yields_no_candidates() {
        assert!(code_candidates("").is_empty());
        assert!(code_candidates("   ").is_empty());
    }

    #[test]
    fn test_all_digit_code_stops_at_last_digit() {
        assert_eq!(code_candidates("123"), ["123", "12", "1"]);
    }

    #[test]
    fn test_resolve_falls_back_to_stripped_root() {
        let kb = KnowledgeBase::new(HashMap::from([(
            "BEACH".to_string(),
            PackagePolicy {
                expected_deposit: 750.0,
                activation: ActivationMethod::Online,
            },
        )]));

        let (matched, policy) = kb.resolve("BEACH123").unwrap();
        assert_eq!(matched, "BEACH");
        assert_eq!(policy.expected_deposit, 750.0);
    }

    #[test]
    fn test_resolve_prefers_exact_entry_over_root() {
        let kb = KnowledgeBase::builtin();
        let (matched, _) = kb.resolve("BEACH123").unwrap();
        assert_eq!(matched, "BEACH123");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.resolve("beach123").is_some());
        assert!(kb.resolve("ski5").is_some());
    }

    #[test]
    fn test_resolve_unknown_code() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.resolve("CRUISE9").is_none());
        assert!(kb.resolve("").is_none());
    }
}
