//! Shared types used across all pipeline stages.
//!
//! These types flow between the combination generator, the URL builder, the
//! matcher and the exporter, and must mean the same thing in all of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One selected (feature, option) pair within a combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub feature: String,
    pub option: String,
}

impl Selection {
    pub fn new(feature: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            option: option.into(),
        }
    }
}

/// A fully-specified choice across feature axes.
///
/// Selections are stored in catalog feature order — the order the axes appear
/// in the product's remote configuration. That order is an observable
/// contract: it fixes the `feature=` parameter order of every generated URL
/// and therefore the bytes of the exported feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub selections: Vec<Selection>,
}

impl Combination {
    pub fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Selected option code for a feature axis, if the axis is present.
    pub fn get(&self, feature: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|s| s.feature == feature)
            .map(|s| s.option.as_str())
    }

    /// True when every selection of `other` appears in `self` and `self`
    /// carries at least one additional axis.
    pub fn is_strict_superset(&self, other: &Combination) -> bool {
        self.len() > other.len()
            && other
                .selections
                .iter()
                .all(|s| self.get(&s.feature) == Some(s.option.as_str()))
    }

    /// Audit rendering: `TEXTILE:LN-2034|FRAME:OAK`.
    pub fn render(&self) -> String {
        self.selections
            .iter()
            .map(|s| format!("{}:{}", s.feature, s.option))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// How the matcher resolved a row to a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Exactly one record passed both filter stages.
    Matched,
    /// Several records passed; the deterministic tiebreak picked one.
    /// Flagged so a human can audit the pick.
    Ambiguous,
    /// No record passed. Normal outcome, not an error.
    Unresolved,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStatus::Matched => "matched",
            MatchStatus::Ambiguous => "ambiguous",
            MatchStatus::Unresolved => "unresolved",
        };
        f.write_str(label)
    }
}

/// One output row of the feed: a (combination, angle) pair with its image
/// URL and the internal catalog record it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedRow {
    /// Internal catalog identifier; `None` when unresolved.
    pub item_no: Option<String>,
    pub product_code: String,
    pub angle: u32,
    pub url: String,
    pub combination: Combination,
    pub match_status: MatchStatus,
}

/// Run-level accounting surfaced to the caller alongside the rows.
///
/// The pipeline always completes with a full row set; partial failures are
/// collected here instead of aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows emitted.
    pub total_rows: usize,
    /// Rows with no catalog record (`item_no` empty in the feed).
    pub unresolved: usize,
    /// Rows where the tiebreak had to pick among several records.
    pub ambiguous: usize,
    /// Skipped exclusive groups and dropped option selections, per product.
    pub config_warnings: Vec<String>,
    /// Per-row validation failures (e.g. out-of-range angle); those rows are
    /// not emitted.
    pub validation_failures: Vec<String>,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.total_rows += other.total_rows;
        self.unresolved += other.unresolved;
        self.ambiguous += other.ambiguous;
        self.config_warnings.extend(other.config_warnings);
        self.validation_failures.extend(other.validation_failures);
    }
}
