//! Image URL construction and parsing.
//!
//! Builds the canonical Cylindo content API URL for one (combination, angle)
//! pair:
//!
//! ```text
//! https://content.cylindo.com/api/v2/{cid}/products/{code}/frames/{angle}.PNG
//!     ?size={size}
//!     &feature={FEATURE}:{OPTION}     (one per axis, catalog order)
//!     &encoding=png
//!     [&skipSharpening=true]
//!     [&removeEnvironmentShadow=true]
//! ```
//!
//! Construction is a pure function of its inputs: identical inputs always
//! yield the byte-identical string, and no network I/O happens here. Query
//! parameter order is fixed so the produced feed is reproducible.
//!
//! [`parse_url`] inverts [`build_url`]: parsing a generated URL recovers the
//! exact combination, angle and parameters used to build it.

use crate::types::{Combination, Selection};
use std::fmt::Write as _;
use thiserror::Error;

/// Cylindo content API root, shared with the fetch client.
pub const CONTENT_API_BASE: &str = "https://content.cylindo.com/api/v2";

/// Camera angle bounds accepted by the frames endpoint.
pub const MIN_ANGLE: u32 = 1;
pub const MAX_ANGLE: u32 = 36;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("angle {0} outside accepted range {MIN_ANGLE}-{MAX_ANGLE}")]
    AngleOutOfRange(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUrlError {
    #[error("not a content API image URL: {0}")]
    WrongBase(String),
    #[error("malformed image URL path: {0}")]
    MalformedPath(String),
    #[error("malformed query parameter: {0}")]
    MalformedQuery(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Rendering parameters shared by every URL of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParams {
    /// Output pixel size on the longer edge.
    pub size: u32,
    pub skip_sharpening: bool,
    pub remove_environment_shadow: bool,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            size: 1500,
            skip_sharpening: false,
            remove_environment_shadow: true,
        }
    }
}

/// Reject angles outside the accepted frame range before any URL is built.
pub fn validate_angle(angle: u32) -> Result<(), ValidationError> {
    if (MIN_ANGLE..=MAX_ANGLE).contains(&angle) {
        Ok(())
    } else {
        Err(ValidationError::AngleOutOfRange(angle))
    }
}

/// Render the canonical image URL for one (combination, angle) pair.
pub fn build_url(
    cid: &str,
    product_code: &str,
    angle: u32,
    combination: &Combination,
    params: &ImageParams,
) -> Result<String, ValidationError> {
    validate_angle(angle)?;

    let mut url = format!(
        "{CONTENT_API_BASE}/{cid}/products/{product_code}/frames/{angle}.PNG?size={}",
        params.size
    );
    for selection in &combination.selections {
        // the ':' separator stays literal; code and option are encoded
        let _ = write!(
            url,
            "&feature={}:{}",
            urlencoding::encode(&selection.feature),
            urlencoding::encode(&selection.option)
        );
    }
    url.push_str("&encoding=png");
    if params.skip_sharpening {
        url.push_str("&skipSharpening=true");
    }
    if params.remove_environment_shadow {
        url.push_str("&removeEnvironmentShadow=true");
    }
    Ok(url)
}

/// A URL decomposed back into the inputs that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImageUrl {
    pub cid: String,
    pub product_code: String,
    pub angle: u32,
    pub combination: Combination,
    pub params: ImageParams,
}

/// Invert [`build_url`]. Accepts any parameter order on the query string.
pub fn parse_url(url: &str) -> Result<ParsedImageUrl, ParseUrlError> {
    let rest = url
        .strip_prefix(CONTENT_API_BASE)
        .and_then(|r| r.strip_prefix('/'))
        .ok_or_else(|| ParseUrlError::WrongBase(url.to_string()))?;

    let (path, query) = rest
        .split_once('?')
        .ok_or_else(|| ParseUrlError::MalformedPath(rest.to_string()))?;

    let segments: Vec<&str> = path.split('/').collect();
    let (cid, product_code, frame) = match segments.as_slice() {
        [cid, "products", code, "frames", frame] => (*cid, *code, *frame),
        _ => return Err(ParseUrlError::MalformedPath(path.to_string())),
    };
    let angle: u32 = frame
        .strip_suffix(".PNG")
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| ParseUrlError::MalformedPath(path.to_string()))?;
    validate_angle(angle)?;

    let mut size = None;
    let mut selections = Vec::new();
    let mut skip_sharpening = false;
    let mut remove_environment_shadow = false;
    for pair in query.split('&') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ParseUrlError::MalformedQuery(pair.to_string()))?;
        match key {
            "size" => {
                size = Some(
                    value
                        .parse()
                        .map_err(|_| ParseUrlError::MalformedQuery(pair.to_string()))?,
                );
            }
            "feature" => {
                let (code, option) = value
                    .split_once(':')
                    .ok_or_else(|| ParseUrlError::MalformedQuery(pair.to_string()))?;
                let code = urlencoding::decode(code)
                    .map_err(|_| ParseUrlError::MalformedQuery(pair.to_string()))?;
                let option = urlencoding::decode(option)
                    .map_err(|_| ParseUrlError::MalformedQuery(pair.to_string()))?;
                selections.push(Selection::new(code.into_owned(), option.into_owned()));
            }
            "skipSharpening" => skip_sharpening = value == "true",
            "removeEnvironmentShadow" => remove_environment_shadow = value == "true",
            "encoding" => {}
            _ => return Err(ParseUrlError::MalformedQuery(pair.to_string())),
        }
    }

    Ok(ParsedImageUrl {
        cid: cid.to_string(),
        product_code: product_code.to_string(),
        angle,
        combination: Combination::new(selections),
        params: ImageParams {
            size: size.ok_or_else(|| ParseUrlError::MalformedQuery("missing size".to_string()))?,
            skip_sharpening,
            remove_environment_shadow,
        },
    })
}
