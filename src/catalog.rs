//! Remote feature/product catalog model.
//!
//! Typed representation of the payloads served by the Cylindo content API.
//! Two endpoints matter to this tool:
//!
//! ```text
//! GET /api/v2/{cid}/listcustomerproducts        → ProductList
//! GET /api/v2/{cid}/products/{code}/configuration → ProductConfiguration
//! ```
//!
//! A product's configuration is a sequence of [`Feature`] axes (TEXTILE,
//! LEATHER, finish, ...), each carrying the [`FeatureOption`] values a
//! customer can pick. The order of `features` in the payload is the catalog
//! order — it is preserved everywhere downstream because generated URLs and
//! feed rows must come out in a stable, reproducible order.
//!
//! These types are read-only for the duration of a run: fetched (or loaded
//! from a fixture) once, then shared by the generator, the URL builder and
//! the matcher.

use serde::{Deserialize, Serialize};

/// One selectable value of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOption {
    /// Machine code used in image URLs (e.g. `LN-2034`).
    pub code: String,
    /// Human label (e.g. `Rainforest Green`). The matcher's color stage
    /// reads this; the API omits it for some customers, hence the default.
    #[serde(default, alias = "label")]
    pub name: String,
}

/// One configurable product axis (e.g. material type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<FeatureOption>,
}

/// A product's remote configuration: its feature axes in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl ProductConfiguration {
    /// Look up a feature axis by code.
    pub fn feature(&self, code: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.code == code)
    }

    /// Resolve an option's human label, if the catalog carries one.
    pub fn option_name(&self, feature_code: &str, option_code: &str) -> Option<&str> {
        self.feature(feature_code)?
            .options
            .iter()
            .find(|o| o.code == option_code)
            .map(|o| o.name.as_str())
            .filter(|n| !n.is_empty())
    }
}

/// Payload of `listcustomerproducts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    pub code: String,
}

impl ProductList {
    /// Product codes in catalog order.
    pub fn codes(self) -> Vec<String> {
        self.products.into_iter().map(|p| p.code).collect()
    }
}
