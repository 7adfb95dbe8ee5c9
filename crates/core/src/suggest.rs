//! "Did you mean" suggestions for unknown names.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use itertools::Itertools;

use crate::error::alternatives;

const MAX_SUGGESTIONS: usize = 3;

/// Candidates that fuzzily match `token`, best first.
pub fn suggestions<'a, I>(token: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if token.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();

    candidates
        .into_iter()
        .filter_map(|candidate| {
            matcher
                .fuzzy_match(candidate, token)
                .map(|score| (score, candidate))
        })
        .sorted_by(|(score_a, name_a), (score_b, name_b)| {
            score_b.cmp(score_a).then_with(|| name_a.cmp(name_b))
        })
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Sentence appended to an error message, empty without suggestions.
pub(crate) fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean {}?", alternatives(suggestions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggests_subsequence_matches() {
        let found = suggestions("bld", ["build", "clean", "bundle"]);
        assert_eq!(found.first().map(String::as_str), Some("build"));
        assert!(!found.contains(&"clean".to_string()));
    }

    #[test]
    fn test_no_suggestions_for_unrelated_token() {
        assert!(suggestions("zzz", ["build", "clean"]).is_empty());
        assert!(suggestions("", ["build"]).is_empty());
    }

    #[test]
    fn test_did_you_mean_sentence() {
        assert_eq!(did_you_mean(&[]), "");
        assert_eq!(
            did_you_mean(&["--verbose".to_string()]),
            " Did you mean `--verbose'?"
        );
    }
}
