//! Feed configuration module.
//!
//! Handles loading and validating `feed.toml`. Configuration is flat: one
//! file per run, stock defaults for anything not set.
//!
//! ## Configuration Options
//!
//! ```toml
//! cid = "4928"                  # Cylindo customer ID (required)
//! size = 1500                   # Output pixel size
//! skip_sharpening = false       # Append skipSharpening=true to URLs
//! remove_environment_shadow = true
//! angles = [1]                  # Camera angles, each 1-36
//! products = ["ATLAS-SOFA"]     # Product codes to process, in feed order
//!
//! # Feature code → selected option codes. Omit the whole table to expand
//! # every option of every feature. A feature absent from a non-empty table
//! # is not selected; an explicit empty list deselects the axis.
//! [features]
//! TEXTILE = ["LN-2034", "LN-2048"]
//! LEATHER = ["AN-07"]
//!
//! # Hand-maintained: feature axes that must never co-occur.
//! exclusive_groups = [["TEXTILE", "LEATHER"]]
//!
//! # Feature axes whose option defines the color/material for record
//! # matching. Defaults to every member of the exclusive groups.
//! material_features = ["TEXTILE", "LEATHER"]
//! ```
//!
//! Unknown keys are rejected to catch typos early. `CYLINDO_CID` in the
//! environment overrides the configured `cid`; the CLI applies that override
//! so this module stays free of process-global state.

use crate::combine::ExclusiveGroup;
use crate::url::{ImageParams, MAX_ANGLE, MIN_ANGLE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Feed configuration loaded from `feed.toml`.
///
/// All fields have stock defaults; user files need only set what they want
/// to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Cylindo customer/tenant identifier.
    pub cid: String,
    /// Output pixel size on the longer edge.
    pub size: u32,
    pub skip_sharpening: bool,
    pub remove_environment_shadow: bool,
    /// Camera angles to render, each within 1-36.
    pub angles: Vec<u32>,
    /// Product codes to process, in feed order.
    pub products: Vec<String>,
    /// Feature code → selected option codes. Empty table = select all.
    pub features: BTreeMap<String, Vec<String>>,
    /// Feature axes that must never co-occur in one combination.
    pub exclusive_groups: Vec<ExclusiveGroup>,
    /// Feature axes whose option defines the color/material for matching.
    /// Empty = every member of `exclusive_groups`.
    pub material_features: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cid: String::new(),
            size: 1500,
            skip_sharpening: false,
            remove_environment_shadow: true,
            angles: vec![1],
            products: Vec::new(),
            features: BTreeMap::new(),
            exclusive_groups: default_exclusive_groups(),
            material_features: Vec::new(),
        }
    }
}

fn default_exclusive_groups() -> Vec<ExclusiveGroup> {
    vec![ExclusiveGroup::new(["TEXTILE", "LEATHER"])]
}

impl FeedConfig {
    /// Validate config values for a generate run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cid.is_empty() {
            return Err(ConfigError::Validation(
                "cid must be set (config file or CYLINDO_CID)".into(),
            ));
        }
        if self.size == 0 {
            return Err(ConfigError::Validation("size must be positive".into()));
        }
        if self.angles.is_empty() {
            return Err(ConfigError::Validation("angles must not be empty".into()));
        }
        if let Some(angle) = self
            .angles
            .iter()
            .find(|a| !(MIN_ANGLE..=MAX_ANGLE).contains(*a))
        {
            return Err(ConfigError::Validation(format!(
                "angle {angle} outside accepted range {MIN_ANGLE}-{MAX_ANGLE}"
            )));
        }
        if self.products.is_empty() {
            return Err(ConfigError::Validation(
                "products must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Angles in the canonical emission order: ascending, deduplicated.
    pub fn sorted_angles(&self) -> Vec<u32> {
        let mut angles = self.angles.clone();
        angles.sort_unstable();
        angles.dedup();
        angles
    }

    /// The URL rendering parameters shared by every row of the run.
    pub fn image_params(&self) -> ImageParams {
        ImageParams {
            size: self.size,
            skip_sharpening: self.skip_sharpening,
            remove_environment_shadow: self.remove_environment_shadow,
        }
    }

    /// Material axes for the matcher: the configured list, or the union of
    /// exclusive group members when none is configured.
    pub fn effective_material_features(&self) -> Vec<String> {
        if !self.material_features.is_empty() {
            return self.material_features.clone();
        }
        let mut features = Vec::new();
        for group in &self.exclusive_groups {
            for code in &group.0 {
                if !features.contains(code) {
                    features.push(code.clone());
                }
            }
        }
        features
    }
}

/// Load configuration from `path`, falling back to stock defaults when the
/// file does not exist. Validation is a separate step: commands that only
/// need the CID can run on a partial config.
pub fn load_config(path: &Path) -> Result<FeedConfig, ConfigError> {
    if !path.exists() {
        return Ok(FeedConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: FeedConfig = toml::from_str(&content)?;
    Ok(config)
}

/// A documented stock `feed.toml`, printed by the `gen-config` command.
pub fn stock_config_toml() -> String {
    r#"# cylindo-feed configuration. All values shown are the defaults.

# Cylindo customer ID. CYLINDO_CID in the environment overrides this.
cid = ""

# Output pixel size on the longer edge.
size = 1500

# Append skipSharpening=true / removeEnvironmentShadow=true to every URL.
skip_sharpening = false
remove_environment_shadow = true

# Camera angles to render, each within 1-36, emitted in ascending order.
angles = [1]

# Product codes to process, in feed order.
products = []

# Feature code -> selected option codes. Omit the whole table to expand
# every option of every feature.
#
# [features]
# TEXTILE = ["LN-2034", "LN-2048"]

# Feature axes that must never co-occur in one combination.
exclusive_groups = [["TEXTILE", "LEATHER"]]

# Feature axes whose option defines the color/material for record matching.
# Empty = every member of exclusive_groups.
material_features = []
"#
    .to_string()
}
