//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Format
//!
//! ```text
//! Products
//! 001 ATLAS-SOFA
//! 002 ATLAS-CHAIR
//!
//! ATLAS-SOFA
//! 001 TEXTILE (2 options)
//!     LN-2034  Rainforest Green
//!     LN-2048  Desert Sand
//!
//! Generated 6 rows (2 unresolved, 1 ambiguous)
//! Warnings
//!     product ATLAS SOFA: exclusive group [TEXTILE, VELVET] ...
//! ```

use crate::catalog::ProductConfiguration;
use crate::types::RunSummary;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Product codes as a numbered inventory.
pub fn format_products(codes: &[String]) -> Vec<String> {
    let mut lines = vec!["Products".to_string()];
    if codes.is_empty() {
        lines.push("    (none)".to_string());
        return lines;
    }
    for (i, code) in codes.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), code));
    }
    lines
}

/// A product's feature axes with their options.
pub fn format_features(product_code: &str, configuration: &ProductConfiguration) -> Vec<String> {
    let mut lines = vec![product_code.to_string()];
    if configuration.features.is_empty() {
        lines.push("    (no features)".to_string());
        return lines;
    }
    for (i, feature) in configuration.features.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} options)",
            format_index(i + 1),
            feature.code,
            feature.options.len()
        ));
        for option in &feature.options {
            if option.name.is_empty() {
                lines.push(format!("    {}", option.code));
            } else {
                lines.push(format!("    {}  {}", option.code, option.name));
            }
        }
    }
    lines
}

/// Run accounting: row counts plus any collected warnings.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} rows ({} unresolved, {} ambiguous)",
        summary.total_rows, summary.unresolved, summary.ambiguous
    )];
    let warnings: Vec<&String> = summary
        .config_warnings
        .iter()
        .chain(&summary.validation_failures)
        .collect();
    if !warnings.is_empty() {
        lines.push("Warnings".to_string());
        for warning in warnings {
            lines.push(format!("    {warning}"));
        }
    }
    lines
}

pub fn print_products(codes: &[String]) {
    for line in format_products(codes) {
        println!("{line}");
    }
}

pub fn print_features(product_code: &str, configuration: &ProductConfiguration) {
    for line in format_features(product_code, configuration) {
        println!("{line}");
    }
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}
