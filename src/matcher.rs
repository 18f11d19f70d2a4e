//! Catalog record matching.
//!
//! Resolves a (product code, combination) pair to one internal catalog
//! record, or to nothing — an unmatched combination is a normal outcome,
//! not an error. Two filter stages run in order and both must pass:
//!
//! 1. **Name stage** — fuzzy similarity between the product code and each
//!    record's item name, scored 0–100 with a token-set measure. Records
//!    scoring below [`NAME_SCORE_THRESHOLD`] drop out. If none survive,
//!    matching stops here.
//! 2. **Color/material stage** — the surviving records must carry at least
//!    one significant word of the selected material option's label in their
//!    `Base Color` field, and their `Color (lookup InRiver)` code must equal
//!    the option code after alphanumeric normalization.
//!
//! Exactly one survivor is a match. Several survivors are resolved by a
//! deterministic tiebreak (lowest item number lexicographically) and flagged
//! so a human can audit the pick. Matching is fully deterministic: the same
//! records and combination always produce the same result.
//!
//! The similarity measure sits behind [`NameSimilarity`] so an equivalent
//! token-set algorithm can be substituted; [`TokenSetRatio`] is the stock
//! implementation.

use crate::catalog::ProductConfiguration;
use crate::records::CatalogRecord;
use crate::types::Combination;
use std::collections::BTreeSet;

/// Minimum name-stage score for a record to stay a candidate.
pub const NAME_SCORE_THRESHOLD: u8 = 85;

/// Scores how alike two strings are on a 0–100 scale.
///
/// Implementations must be insensitive to word order and duplicate words:
/// shuffling tokens in either input may not change the score.
pub trait NameSimilarity {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Token-set similarity.
///
/// Both inputs are lowercased and split into sorted, deduplicated token
/// sets. The score is the best pairwise similarity between the joined
/// intersection and each side's intersection-plus-remainder, which makes the
/// measure symmetric, order-insensitive and generous to subsets: a product
/// code whose tokens all appear in an item name scores 100 regardless of
/// extra words in the name.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSetRatio;

impl NameSimilarity for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let tokens_a = tokens(a);
        let tokens_b = tokens(b);
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return if tokens_a.is_empty() && tokens_b.is_empty() { 100 } else { 0 };
        }

        let intersection: Vec<&str> = tokens_a
            .intersection(&tokens_b)
            .map(String::as_str)
            .collect();
        let only_a: Vec<&str> = tokens_a.difference(&tokens_b).map(String::as_str).collect();
        let only_b: Vec<&str> = tokens_b.difference(&tokens_a).map(String::as_str).collect();

        let base = intersection.join(" ");
        let with_a = join_parts(&base, &only_a);
        let with_b = join_parts(&base, &only_b);

        indel_similarity(&base, &with_a)
            .max(indel_similarity(&base, &with_b))
            .max(indel_similarity(&with_a, &with_b))
    }
}

/// Lowercased alphanumeric tokens, sorted and deduplicated.
fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_parts(base: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        rest.join(" ")
    } else {
        format!("{base} {}", rest.join(" "))
    }
}

/// Similarity of two strings as 100 minus the normalized insert/delete
/// distance, computed via the longest common subsequence.
fn indel_similarity(a: &str, b: &str) -> u8 {
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let lcs = lcs_length(&a, &b);
    ((200 * lcs) as f64 / total as f64).round() as u8
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Strip every character that is not a letter or digit, then lowercase.
/// Idempotent.
pub fn normalize_code(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Words of a color label worth checking against `Base Color`: alphabetic
/// runs of three or more letters, lowercased. Short connectives and bare
/// code fragments carry no signal.
pub fn significant_words(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.len() >= 3)
        .map(str::to_string)
        .collect()
}

/// Outcome of resolving one combination against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    /// Exactly one record passed both stages.
    Matched(&'a CatalogRecord),
    /// Several records passed; `record` is the deterministic pick.
    Ambiguous {
        record: &'a CatalogRecord,
        candidates: usize,
    },
    /// No record passed. Normal outcome.
    Unresolved,
}

/// Resolve a combination with the stock [`TokenSetRatio`] scorer.
pub fn find_item<'a>(
    product_code: &str,
    combination: &Combination,
    configuration: &ProductConfiguration,
    material_features: &[String],
    catalog: &'a [CatalogRecord],
) -> MatchOutcome<'a> {
    find_item_with_scorer(
        product_code,
        combination,
        configuration,
        material_features,
        catalog,
        &TokenSetRatio,
    )
}

/// Resolve a combination using a caller-supplied similarity scorer.
pub fn find_item_with_scorer<'a>(
    product_code: &str,
    combination: &Combination,
    configuration: &ProductConfiguration,
    material_features: &[String],
    catalog: &'a [CatalogRecord],
    scorer: &dyn NameSimilarity,
) -> MatchOutcome<'a> {
    // Stage 1: fuzzy name filter.
    let by_name: Vec<&CatalogRecord> = catalog
        .iter()
        .filter(|r| scorer.score(product_code, &r.item_name) >= NAME_SCORE_THRESHOLD)
        .collect();
    if by_name.is_empty() {
        return MatchOutcome::Unresolved;
    }

    // Stage 2: color word + normalized material code. Without a material
    // selection (or a label to take color words from) nothing can pass.
    let Some((option_code, label)) = material_selection(combination, configuration, material_features)
    else {
        return MatchOutcome::Unresolved;
    };
    let words = significant_words(label);
    let normalized_option = normalize_code(option_code);

    let mut candidates: Vec<&CatalogRecord> = by_name
        .into_iter()
        .filter(|r| {
            let base_color = r.base_color.to_lowercase();
            words.iter().any(|w| base_color.contains(w))
                && normalize_code(&r.color_lookup_code) == normalized_option
        })
        .collect();

    match candidates.len() {
        0 => MatchOutcome::Unresolved,
        1 => MatchOutcome::Matched(candidates[0]),
        n => {
            candidates.sort_by(|a, b| a.item_no.cmp(&b.item_no));
            MatchOutcome::Ambiguous {
                record: candidates[0],
                candidates: n,
            }
        }
    }
}

/// The combination's material/color-defining selection: first axis whose
/// feature code is in `material_features`, with its catalog label.
fn material_selection<'c>(
    combination: &'c Combination,
    configuration: &'c ProductConfiguration,
    material_features: &[String],
) -> Option<(&'c str, &'c str)> {
    let selection = combination
        .selections
        .iter()
        .find(|s| material_features.iter().any(|m| *m == s.feature))?;
    let label = configuration.option_name(&selection.feature, &selection.option)?;
    Some((selection.option.as_str(), label))
}
