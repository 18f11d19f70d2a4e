//! # Cylindo Feed
//!
//! Bulk CSV feed generator mapping an internal product catalog to Cylindo
//! product-image URLs. For every selected product it expands the chosen
//! feature options into all valid combinations, renders the canonical image
//! URL for each combination and camera angle, and resolves each combination
//! back to an internal catalog record by item number.
//!
//! # Architecture: Generation Pipeline
//!
//! ```text
//! 1. Fetch     content API   →  product configurations   (feature axes)
//! 2. Combine   selections    →  valid combinations       (exclusivity rules)
//! 3. Build     combinations  →  image URLs               (one per angle)
//! 4. Match     combinations  →  catalog records          (two-stage filter)
//! 5. Export    rows          →  feed.csv                 (;-delimited)
//! ```
//!
//! Steps 2–4 are pure functions over data loaded once per run, so the whole
//! engine unit-tests without a network or a filesystem. Only the fetch and
//! export edges do I/O.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Remote catalog model — features, options, product lists |
//! | [`records`] | Internal catalog table — CSV loading and validation |
//! | [`combine`] | Combination generator — cartesian expansion under exclusive groups |
//! | [`url`] | Canonical image URL construction and parsing |
//! | [`matcher`] | Two-stage record matcher with token-set name similarity |
//! | [`pipeline`] | Per-product orchestration and run accounting |
//! | [`fetch`] | Blocking Cylindo content API client |
//! | [`export`] | `;`-delimited CSV feed writer |
//! | [`config`] | `feed.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared types flowing between stages |
//!
//! # Design Decisions
//!
//! ## Ordering Is a Contract
//!
//! Downstream imports diff consecutive feeds, so row order must be
//! reproducible: products in selection order, combinations in generator
//! order, angles ascending, URL query parameters in a fixed sequence.
//! Identical inputs produce a byte-identical feed.
//!
//! ## Exclusive Groups Branch, Never Error
//!
//! Material axes like TEXTILE and LEATHER are mutually exclusive on the
//! rendered model. When both carry selections the generator forks one
//! branch per active member instead of failing — the catalog genuinely
//! offers both materials, just never together.
//!
//! ## Unmatched Is Not an Error
//!
//! The internal catalog trails the visualization catalog, so combinations
//! without a record are expected. The pipeline emits every row regardless,
//! leaves the item number empty, and reports counts — partial data is more
//! valuable than an aborted export.
//!
//! ## Similarity Behind a Trait
//!
//! The name stage only requires an order- and duplicate-insensitive 0–100
//! score, so the scorer is a one-method trait with a token-set
//! implementation. Matching behavior is pinned by tests on the contract,
//! not on a particular string-distance library.

pub mod catalog;
pub mod combine;
pub mod config;
pub mod export;
pub mod fetch;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod types;
pub mod url;

#[cfg(test)]
pub(crate) mod test_helpers;
