//! Combination generation.
//!
//! Expands the selected options of a product's feature axes into the full
//! set of valid combinations. Two rules shape the output:
//!
//! - **Cartesian product** over independent axes: every selected option of
//!   every axis pairs with every selected option of every other axis.
//! - **Exclusive groups** branch instead of multiplying: axes in the same
//!   group (say TEXTILE and LEATHER) never co-occur, so each active member
//!   spawns an alternative branch in which the other members are absent.
//!
//! ## Ordering
//!
//! Output order is a contract, not an accident — it fixes downstream feed
//! row order. Axes keep the order they were passed in (catalog order),
//! options keep selection order, the rightmost axis varies fastest, and
//! group branches follow the catalog order of the active member.
//!
//! ## Stale group tables
//!
//! The group table is hand-maintained and can drift from the live catalog.
//! A group naming a feature code that does not exist in the input selection
//! is reported as a [`ConfigurationError`] and skipped — the run continues
//! with unrestricted expansion for that group.

use crate::types::{Combination, Selection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A skipped exclusive group. Non-fatal: reported as a warning while the
/// run continues without the group's constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("exclusive group [{group}] references unknown feature \"{feature}\"; group skipped")]
pub struct ConfigurationError {
    pub group: String,
    pub feature: String,
}

/// Feature codes that must never co-occur in one combination.
///
/// Serialized as a plain array, so a TOML table of groups reads naturally:
///
/// ```toml
/// exclusive_groups = [["TEXTILE", "LEATHER"]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusiveGroup(pub Vec<String>);

impl ExclusiveGroup {
    pub fn new<S: Into<String>>(features: impl IntoIterator<Item = S>) -> Self {
        Self(features.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|f| f == code)
    }

    fn describe(&self) -> String {
        self.0.join(", ")
    }
}

/// The chosen option codes for one feature axis, in selection order.
///
/// An empty `options` list means the axis was deselected: it is excluded
/// from every combination without blocking expansion of the other axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSelection {
    pub feature: String,
    pub options: Vec<String>,
}

impl FeatureSelection {
    pub fn new<S: Into<String>>(feature: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            feature: feature.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Generator output: the valid combinations plus any non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub combinations: Vec<Combination>,
    pub warnings: Vec<ConfigurationError>,
}

/// Expand `selections` into all valid combinations under `groups`.
///
/// Deterministic: identical inputs always produce the identical sequence.
pub fn generate(selections: &[FeatureSelection], groups: &[ExclusiveGroup]) -> Generated {
    let mut warnings = Vec::new();

    // Axes with at least one selected option, catalog order preserved.
    let active: Vec<&FeatureSelection> =
        selections.iter().filter(|s| !s.options.is_empty()).collect();

    // Validate groups against the full input sequence (a deselected axis is
    // still a known code). Groups with fewer than two active members impose
    // no constraint and need no branch.
    let known: HashSet<&str> = selections.iter().map(|s| s.feature.as_str()).collect();
    let mut member_sets: Vec<Vec<&FeatureSelection>> = Vec::new();
    for group in groups {
        if let Some(feature) = group.0.iter().find(|code| !known.contains(code.as_str())) {
            warnings.push(ConfigurationError {
                group: group.describe(),
                feature: feature.clone(),
            });
            continue;
        }
        let members: Vec<&FeatureSelection> = active
            .iter()
            .copied()
            .filter(|s| group.contains(&s.feature))
            .collect();
        if members.len() > 1 {
            member_sets.push(members);
        }
    }

    let mut combinations = Vec::new();
    for excluded in exclusion_branches(&member_sets) {
        let axes: Vec<&FeatureSelection> = active
            .iter()
            .copied()
            .filter(|s| !excluded.contains(s.feature.as_str()))
            .collect();
        expand(&axes, &mut combinations);
    }

    Generated {
        combinations: dedup(combinations),
        warnings,
    }
}

/// One exclusion set per branch: for every group, keep one active member and
/// exclude the rest. Earlier groups vary slowest. With no groups, the single
/// empty exclusion set yields the plain cartesian product.
fn exclusion_branches<'a>(member_sets: &[Vec<&'a FeatureSelection>]) -> Vec<HashSet<&'a str>> {
    let mut branches: Vec<HashSet<&str>> = vec![HashSet::new()];
    for members in member_sets {
        let mut next = Vec::with_capacity(branches.len() * members.len());
        for base in &branches {
            for keep in 0..members.len() {
                let mut excluded = base.clone();
                for (i, member) in members.iter().enumerate() {
                    if i != keep {
                        excluded.insert(member.feature.as_str());
                    }
                }
                next.push(excluded);
            }
        }
        branches = next;
    }
    branches
}

/// Cartesian product over the given axes, rightmost axis varying fastest.
/// Zero axes produce nothing: a combination selects at least one option.
fn expand(axes: &[&FeatureSelection], out: &mut Vec<Combination>) {
    if axes.is_empty() {
        return;
    }
    let mut indices = vec![0usize; axes.len()];
    loop {
        out.push(Combination::new(
            axes.iter()
                .zip(&indices)
                .map(|(axis, &i)| Selection::new(axis.feature.clone(), axis.options[i].clone()))
                .collect(),
        ));
        let mut pos = axes.len();
        loop {
            if pos == 0 {
                return;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < axes[pos].options.len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

/// Drop exact duplicates (keeping the first occurrence) and any combination
/// that is a strict superset of another generated combination.
fn dedup(combinations: Vec<Combination>) -> Vec<Combination> {
    let mut unique: Vec<Combination> = Vec::new();
    for combination in combinations {
        if !unique.contains(&combination) {
            unique.push(combination);
        }
    }
    let minimal: Vec<bool> = unique
        .iter()
        .map(|c| !unique.iter().any(|other| c.is_strict_superset(other)))
        .collect();
    unique
        .into_iter()
        .zip(minimal)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect()
}
