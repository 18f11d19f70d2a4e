//! End-to-end pipeline test: configuration and in-memory catalog in, ordered
//! feed rows and CSV bytes out. No network — product configurations are
//! supplied as the fetch stage would have returned them.

use cylindo_feed::catalog::{Feature, FeatureOption, ProductConfiguration};
use cylindo_feed::config::FeedConfig;
use cylindo_feed::export;
use cylindo_feed::pipeline::{self, ProductInput};
use cylindo_feed::records::CatalogRecord;
use cylindo_feed::types::MatchStatus;
use cylindo_feed::url;

fn feature(code: &str, options: &[(&str, &str)]) -> Feature {
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

fn record(item_no: &str, item_name: &str, base_color: &str, lookup: &str) -> CatalogRecord {
    CatalogRecord {
        item_no: item_no.to_string(),
        item_name: item_name.to_string(),
        base_color: base_color.to_string(),
        color_lookup_code: lookup.to_string(),
    }
}

fn sofa() -> ProductInput {
    ProductInput {
        code: "ATLAS-SOFA".into(),
        configuration: ProductConfiguration {
            features: vec![
                feature(
                    "TEXTILE",
                    &[("LN-2034", "Rainforest Green"), ("LN-2048", "Desert Sand")],
                ),
                feature("LEATHER", &[("AN-07", "Cognac Brown")]),
                feature("FRAME", &[("OAK", "Oak"), ("WALNUT", "Walnut")]),
            ],
        },
    }
}

fn catalog() -> Vec<CatalogRecord> {
    vec![
        record("10-4401", "Atlas Sofa", "Green Collection", "ln2034"),
        record("10-4402", "Atlas Sofa", "Sand Collection", "ln2048"),
        record("10-4403", "Atlas Sofa", "Brown Collection", "an07"),
    ]
}

fn run_config() -> FeedConfig {
    FeedConfig {
        cid: "4928".into(),
        products: vec!["ATLAS-SOFA".into()],
        angles: vec![2, 1],
        ..FeedConfig::default()
    }
}

#[test]
fn full_run_produces_ordered_resolved_feed() {
    let result = pipeline::run(&run_config(), &[sofa()], &catalog());

    // 3 material branches × 2 frame options × 2 angles
    assert_eq!(result.rows.len(), 12);
    assert_eq!(result.summary.total_rows, 12);
    assert_eq!(result.summary.unresolved, 0);
    assert_eq!(result.summary.ambiguous, 0);
    assert!(result.summary.config_warnings.is_empty());

    // combinations in generator order, angles ascending within each
    let first = &result.rows[0];
    assert_eq!(first.combination.render(), "TEXTILE:LN-2034|FRAME:OAK");
    assert_eq!(first.angle, 1);
    assert_eq!(result.rows[1].angle, 2);
    assert_eq!(
        result.rows[2].combination.render(),
        "TEXTILE:LN-2034|FRAME:WALNUT"
    );

    // the material axes never pair
    for row in &result.rows {
        assert!(
            row.combination.get("TEXTILE").is_none() || row.combination.get("LEATHER").is_none()
        );
    }

    // every material resolved to its record
    assert_eq!(first.item_no.as_deref(), Some("10-4401"));
    let leather_row = result
        .rows
        .iter()
        .find(|r| r.combination.get("LEATHER").is_some())
        .unwrap();
    assert_eq!(leather_row.item_no.as_deref(), Some("10-4403"));
    assert!(result.rows.iter().all(|r| r.match_status == MatchStatus::Matched));
}

#[test]
fn generated_urls_round_trip_through_the_parser() {
    let result = pipeline::run(&run_config(), &[sofa()], &catalog());

    for row in &result.rows {
        let parsed = url::parse_url(&row.url).unwrap();
        assert_eq!(parsed.cid, "4928");
        assert_eq!(parsed.product_code, "ATLAS-SOFA");
        assert_eq!(parsed.angle, row.angle);
        assert_eq!(parsed.combination, row.combination);
        assert_eq!(parsed.params.size, 1500);
        assert!(parsed.params.remove_environment_shadow);
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let first = pipeline::run(&run_config(), &[sofa()], &catalog());
    let second = pipeline::run(&run_config(), &[sofa()], &catalog());

    let mut feed_a = Vec::new();
    let mut feed_b = Vec::new();
    export::write_feed(&mut feed_a, &first.rows).unwrap();
    export::write_feed(&mut feed_b, &second.rows).unwrap();

    assert_eq!(feed_a, feed_b);
}

#[test]
fn missing_records_leave_rows_unresolved_but_present() {
    // catalog without the leather record
    let partial = vec![
        record("10-4401", "Atlas Sofa", "Green Collection", "ln2034"),
        record("10-4402", "Atlas Sofa", "Sand Collection", "ln2048"),
    ];

    let result = pipeline::run(&run_config(), &[sofa()], &partial);

    assert_eq!(result.rows.len(), 12);
    let unresolved: Vec<_> = result
        .rows
        .iter()
        .filter(|r| r.match_status == MatchStatus::Unresolved)
        .collect();
    // 1 leather branch × 2 frames × 2 angles
    assert_eq!(unresolved.len(), 4);
    assert!(unresolved.iter().all(|r| r.item_no.is_none()));
    assert_eq!(result.summary.unresolved, 4);
}

#[test]
fn exported_feed_is_importable_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.csv");

    let result = pipeline::run(&run_config(), &[sofa()], &catalog());
    export::write_feed_file(&path, &result.rows).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Item No;Product;Frame;Options;Image URL;Match"
    );
    assert_eq!(content.lines().count(), 13);
    let first = content.lines().nth(1).unwrap();
    assert!(first.starts_with("10-4401;ATLAS-SOFA;1;TEXTILE:LN-2034|FRAME:OAK;"));
    assert!(first.ends_with(";matched"));
}
