//! Shared fixture builders for unit tests.
//!
//! Keeps test setup terse: a feature axis, a product configuration or a
//! catalog record in one line each.

use crate::catalog::{Feature, FeatureOption, ProductConfiguration};
use crate::records::CatalogRecord;

/// A feature axis with `(code, label)` options.
pub(crate) fn feature(code: &str, options: &[(&str, &str)]) -> Feature {
    Feature {
        code: code.to_string(),
        name: String::new(),
        options: options
            .iter()
            .map(|(code, name)| FeatureOption {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

pub(crate) fn configuration(features: Vec<Feature>) -> ProductConfiguration {
    ProductConfiguration { features }
}

pub(crate) fn record(
    item_no: &str,
    item_name: &str,
    base_color: &str,
    color_lookup_code: &str,
) -> CatalogRecord {
    CatalogRecord {
        item_no: item_no.to_string(),
        item_name: item_name.to_string(),
        base_color: base_color.to_string(),
        color_lookup_code: color_lookup_code.to_string(),
    }
}
