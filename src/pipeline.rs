//! Feed generation pipeline.
//!
//! Orchestrates the stages per selected product:
//!
//! ```text
//! selections → combine::generate → url::build_url (per angle) → matcher → rows
//! ```
//!
//! ## Ordering contract
//!
//! Rows come out in a fixed order consumed as-is by the CSV export: products
//! in user-selection order, combinations in generator order, angles
//! ascending. Products are processed on the rayon pool — order-preserving
//! collection keeps the contract without a re-sort.
//!
//! ## Failure handling
//!
//! The pipeline always completes with a full row set. An unresolved match
//! emits its row with an empty item number and bumps a counter; a stale
//! exclusive group drops only that group's constraint; an out-of-range angle
//! drops only that product/angle slice. All of it lands in [`RunSummary`].

use crate::catalog::ProductConfiguration;
use crate::combine::{self, FeatureSelection};
use crate::config::FeedConfig;
use crate::matcher::{self, MatchOutcome, NameSimilarity, TokenSetRatio};
use crate::records::CatalogRecord;
use crate::types::{GeneratedRow, MatchStatus, RunSummary};
use crate::url;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// One product ready for generation: its code plus the fetched remote
/// configuration.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub code: String,
    pub configuration: ProductConfiguration,
}

/// Everything a run produces: the ordered rows and the accounting.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub rows: Vec<GeneratedRow>,
    pub summary: RunSummary,
}

/// Run the pipeline with the stock [`TokenSetRatio`] scorer.
pub fn run(config: &FeedConfig, products: &[ProductInput], catalog: &[CatalogRecord]) -> RunOutput {
    run_with_scorer(config, products, catalog, &TokenSetRatio)
}

/// Run the pipeline with a caller-supplied similarity scorer.
pub fn run_with_scorer(
    config: &FeedConfig,
    products: &[ProductInput],
    catalog: &[CatalogRecord],
    scorer: &(dyn NameSimilarity + Sync),
) -> RunOutput {
    let angles = config.sorted_angles();
    let params = config.image_params();
    let material_features = config.effective_material_features();

    let per_product: Vec<RunOutput> = products
        .par_iter()
        .map(|product| {
            process_product(
                product,
                config,
                &angles,
                &params,
                &material_features,
                catalog,
                scorer,
            )
        })
        .collect();

    let mut output = RunOutput::default();
    for part in per_product {
        output.rows.extend(part.rows);
        output.summary.merge(part.summary);
    }
    output
}

fn process_product(
    product: &ProductInput,
    config: &FeedConfig,
    angles: &[u32],
    params: &url::ImageParams,
    material_features: &[String],
    catalog: &[CatalogRecord],
    scorer: &dyn NameSimilarity,
) -> RunOutput {
    let mut summary = RunSummary::default();

    let selections = select_features(product, &config.features, &mut summary.config_warnings);
    let generated = combine::generate(&selections, &config.exclusive_groups);
    summary.config_warnings.extend(
        generated
            .warnings
            .iter()
            .map(|w| format!("product {}: {w}", product.code)),
    );

    // Validate each angle once per product; a bad angle drops that slice
    // of rows only.
    let mut valid_angles = Vec::with_capacity(angles.len());
    for &angle in angles {
        match url::validate_angle(angle) {
            Ok(()) => valid_angles.push(angle),
            Err(e) => summary
                .validation_failures
                .push(format!("product {}: {e}", product.code)),
        }
    }

    let mut rows = Vec::new();
    for combination in &generated.combinations {
        for &angle in &valid_angles {
            // angle pre-validated, so build_url cannot fail here
            let Ok(url) = url::build_url(&config.cid, &product.code, angle, combination, params)
            else {
                continue;
            };
            let outcome = matcher::find_item_with_scorer(
                &product.code,
                combination,
                &product.configuration,
                material_features,
                catalog,
                scorer,
            );
            let (item_no, match_status) = match outcome {
                MatchOutcome::Matched(record) => {
                    (Some(record.item_no.clone()), MatchStatus::Matched)
                }
                MatchOutcome::Ambiguous { record, .. } => {
                    summary.ambiguous += 1;
                    (Some(record.item_no.clone()), MatchStatus::Ambiguous)
                }
                MatchOutcome::Unresolved => {
                    summary.unresolved += 1;
                    (None, MatchStatus::Unresolved)
                }
            };
            rows.push(GeneratedRow {
                item_no,
                product_code: product.code.clone(),
                angle,
                url,
                combination: combination.clone(),
                match_status,
            });
        }
    }

    summary.total_rows = rows.len();
    RunOutput { rows, summary }
}

/// Translate the configured selections into generator input, in catalog
/// feature order.
///
/// An empty `features` table selects every option of every axis (bulk
/// export). Otherwise only listed axes are selected; option codes that do
/// not exist on the axis are dropped with a warning.
fn select_features(
    product: &ProductInput,
    selected: &BTreeMap<String, Vec<String>>,
    warnings: &mut Vec<String>,
) -> Vec<FeatureSelection> {
    product
        .configuration
        .features
        .iter()
        .map(|feature| {
            let options: Vec<String> = if selected.is_empty() {
                feature.options.iter().map(|o| o.code.clone()).collect()
            } else {
                match selected.get(&feature.code) {
                    None => Vec::new(),
                    Some(codes) => codes
                        .iter()
                        .filter(|code| {
                            let known = feature.options.iter().any(|o| o.code == **code);
                            if !known {
                                warnings.push(format!(
                                    "product {}: feature {} has no option \"{}\"; selection dropped",
                                    product.code, feature.code, code
                                ));
                            }
                            known
                        })
                        .cloned()
                        .collect(),
                }
            };
            FeatureSelection {
                feature: feature.code.clone(),
                options,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::ExclusiveGroup;
    use crate::test_helpers::{configuration, feature, record};

    fn atlas_product() -> ProductInput {
        ProductInput {
            code: "ATLAS-SOFA".into(),
            configuration: configuration(vec![
                feature(
                    "TEXTILE",
                    &[("LN-2034", "Rainforest Green"), ("LN-2048", "Desert Sand")],
                ),
                feature("LEATHER", &[("AN-07", "Cognac Brown")]),
            ]),
        }
    }

    fn base_config() -> FeedConfig {
        FeedConfig {
            cid: "4928".into(),
            products: vec!["ATLAS-SOFA".into()],
            angles: vec![1, 2],
            ..FeedConfig::default()
        }
    }

    fn catalog() -> Vec<CatalogRecord> {
        vec![
            record("10-4401", "Atlas Sofa", "Green Collection", "ln2034"),
            record("10-4402", "Atlas Sofa", "Sand Collection", "ln2048"),
        ]
    }

    #[test]
    fn rows_follow_the_canonical_order() {
        let output = run(&base_config(), &[atlas_product()], &catalog());

        // exclusive group branches: 2 TEXTILE + 1 LEATHER combos, × 2 angles
        assert_eq!(output.rows.len(), 6);
        let order: Vec<(String, u32)> = output
            .rows
            .iter()
            .map(|r| (r.combination.render(), r.angle))
            .collect();
        assert_eq!(
            order,
            vec![
                ("TEXTILE:LN-2034".to_string(), 1),
                ("TEXTILE:LN-2034".to_string(), 2),
                ("TEXTILE:LN-2048".to_string(), 1),
                ("TEXTILE:LN-2048".to_string(), 2),
                ("LEATHER:AN-07".to_string(), 1),
                ("LEATHER:AN-07".to_string(), 2),
            ]
        );
    }

    #[test]
    fn angles_are_emitted_ascending_regardless_of_config_order() {
        let config = FeedConfig {
            angles: vec![9, 1],
            ..base_config()
        };
        let output = run(&config, &[atlas_product()], &catalog());

        let angles: Vec<u32> = output.rows.iter().take(2).map(|r| r.angle).collect();
        assert_eq!(angles, vec![1, 9]);
    }

    #[test]
    fn matched_rows_carry_the_item_no() {
        let output = run(&base_config(), &[atlas_product()], &catalog());

        let first = &output.rows[0];
        assert_eq!(first.item_no.as_deref(), Some("10-4401"));
        assert_eq!(first.match_status, MatchStatus::Matched);
        assert!(first.url.contains("feature=TEXTILE:LN-2034"));
    }

    #[test]
    fn unresolved_rows_are_emitted_and_counted() {
        // LEATHER AN-07 has no catalog record → 2 unresolved rows (2 angles)
        let output = run(&base_config(), &[atlas_product()], &catalog());

        let unresolved: Vec<&GeneratedRow> = output
            .rows
            .iter()
            .filter(|r| r.match_status == MatchStatus::Unresolved)
            .collect();
        assert_eq!(unresolved.len(), 2);
        assert!(unresolved.iter().all(|r| r.item_no.is_none()));
        assert_eq!(output.summary.unresolved, 2);
        assert_eq!(output.summary.total_rows, 6);
    }

    #[test]
    fn ambiguous_rows_are_flagged_and_counted() {
        let mut records = catalog();
        records.push(record("10-4400", "Atlas Sofa", "Deep Green", "ln2034"));

        let output = run(&base_config(), &[atlas_product()], &records);

        let ambiguous: Vec<&GeneratedRow> = output
            .rows
            .iter()
            .filter(|r| r.match_status == MatchStatus::Ambiguous)
            .collect();
        assert_eq!(ambiguous.len(), 2);
        // deterministic tiebreak: lowest item number
        assert!(ambiguous.iter().all(|r| r.item_no.as_deref() == Some("10-4400")));
        assert_eq!(output.summary.ambiguous, 2);
    }

    #[test]
    fn stale_group_warns_and_falls_back_to_cartesian() {
        let config = FeedConfig {
            exclusive_groups: vec![ExclusiveGroup::new(["TEXTILE", "VELVET"])],
            angles: vec![1],
            ..base_config()
        };

        let output = run(&config, &[atlas_product()], &catalog());

        assert_eq!(output.summary.config_warnings.len(), 1);
        assert!(output.summary.config_warnings[0].starts_with("product ATLAS-SOFA:"));
        // unrestricted expansion: TEXTILE × LEATHER
        assert_eq!(output.rows.len(), 2);
        assert!(
            output.rows[0].combination.get("TEXTILE").is_some()
                && output.rows[0].combination.get("LEATHER").is_some()
        );
    }

    #[test]
    fn out_of_range_angle_drops_only_that_slice() {
        let config = FeedConfig {
            angles: vec![1, 37],
            ..base_config()
        };

        let output = run(&config, &[atlas_product()], &catalog());

        assert!(output.rows.iter().all(|r| r.angle == 1));
        assert_eq!(output.summary.validation_failures.len(), 1);
        assert!(output.summary.validation_failures[0].contains("37"));
        assert_eq!(output.rows.len(), 3);
    }

    #[test]
    fn explicit_selection_restricts_expansion() {
        let mut config = base_config();
        config.angles = vec![1];
        config
            .features
            .insert("TEXTILE".into(), vec!["LN-2034".into()]);

        let output = run(&config, &[atlas_product()], &catalog());

        // LEATHER not selected → only the one TEXTILE combination
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.rows[0].combination.render(), "TEXTILE:LN-2034");
    }

    #[test]
    fn unknown_selected_option_is_dropped_with_warning() {
        let mut config = base_config();
        config.angles = vec![1];
        config
            .features
            .insert("TEXTILE".into(), vec!["LN-9999".into(), "LN-2034".into()]);

        let output = run(&config, &[atlas_product()], &catalog());

        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.rows[0].combination.render(), "TEXTILE:LN-2034");
        assert!(
            output
                .summary
                .config_warnings
                .iter()
                .any(|w| w.contains("LN-9999"))
        );
    }

    #[test]
    fn products_are_processed_in_selection_order() {
        let chair = ProductInput {
            code: "ATLAS-CHAIR".into(),
            configuration: configuration(vec![feature("TEXTILE", &[("LN-2034", "Rainforest Green")])]),
        };
        let config = FeedConfig {
            angles: vec![1],
            ..base_config()
        };

        let output = run(&config, &[chair.clone(), atlas_product()], &catalog());

        assert_eq!(output.rows[0].product_code, "ATLAS-CHAIR");
        assert!(
            output
                .rows
                .iter()
                .skip(1)
                .all(|r| r.product_code == "ATLAS-SOFA")
        );
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let first = run(&base_config(), &[atlas_product()], &catalog());
        let second = run(&base_config(), &[atlas_product()], &catalog());

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.summary, second.summary);
    }
}
