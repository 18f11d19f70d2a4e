use clap::{Parser, Subcommand};
use cylindo_feed::{config, export, fetch, output, pipeline, records};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cylindo-feed")]
#[command(version)]
#[command(about = "Generate a CSV feed of Cylindo product-image URLs")]
#[command(long_about = "\
Generate a CSV feed of Cylindo product-image URLs

For every selected product, expands the chosen feature options into all
valid combinations (material axes like TEXTILE and LEATHER never pair),
renders one image URL per combination and camera angle, and resolves each
combination to an internal catalog record by item number.

Inputs:

  feed.toml     Run configuration: CID, products, selections, angles.
                Run 'cylindo-feed gen-config' for a documented template.
  catalog.csv   Internal catalog export with columns
                Item No;Item Name;Base Color;Color (lookup InRiver)

The CYLINDO_CID environment variable overrides the configured CID.

Output is a ;-delimited CSV, one row per (combination, angle) pair, with
an empty Item No cell where no catalog record matched and a Match column
flagging ambiguous picks for audit.")]
struct Cli {
    /// Run configuration file
    #[arg(long, default_value = "feed.toml", global = true)]
    config: PathBuf,

    /// Internal catalog table (CSV)
    #[arg(long, default_value = "catalog.csv", global = true)]
    catalog: PathBuf,

    /// Output feed file
    #[arg(long, default_value = "cylindo_export.csv", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the product codes available to the configured CID
    Products,
    /// Show a product's feature axes and options
    Features {
        /// Product code
        product: String,
    },
    /// Validate configuration and catalog table without fetching
    Check,
    /// Run the full pipeline and write the feed
    Generate,
    /// Print a stock feed.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Products => {
            let config = load_config_with_env(&cli.config)?;
            let client = fetch::ContentClient::new(require_cid(&config)?)?;
            let codes = client.list_products()?;
            output::print_products(&codes);
        }
        Command::Features { product } => {
            let config = load_config_with_env(&cli.config)?;
            let client = fetch::ContentClient::new(require_cid(&config)?)?;
            let configuration = client.product_configuration(&product)?;
            output::print_features(&product, &configuration);
        }
        Command::Check => {
            let config = load_config_with_env(&cli.config)?;
            config.validate()?;
            println!(
                "Config OK: {} products, {} angles",
                config.products.len(),
                config.sorted_angles().len()
            );
            let catalog = records::load_catalog(&cli.catalog)?;
            println!("Catalog OK: {} records", catalog.len());
        }
        Command::Generate => {
            let config = load_config_with_env(&cli.config)?;
            config.validate()?;
            let catalog = records::load_catalog(&cli.catalog)?;

            println!("==> Fetching {} product configurations", config.products.len());
            let client = fetch::ContentClient::new(config.cid.clone())?;
            let mut products = Vec::new();
            for code in &config.products {
                match client.product_configuration(code) {
                    Ok(configuration) if configuration.features.is_empty() => {
                        eprintln!("Skipping {code}: no features in remote configuration");
                    }
                    Ok(configuration) => products.push(pipeline::ProductInput {
                        code: code.clone(),
                        configuration,
                    }),
                    Err(e) => eprintln!("Skipping {code}: {e}"),
                }
            }

            println!("==> Generating feed");
            let result = pipeline::run(&config, &products, &catalog);
            export::write_feed_file(&cli.output, &result.rows)?;
            output::print_summary(&result.summary);
            println!("==> Feed written to {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the run configuration, letting CYLINDO_CID in the environment
/// override the configured CID.
fn load_config_with_env(path: &std::path::Path) -> Result<config::FeedConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    if let Ok(cid) = std::env::var("CYLINDO_CID")
        && !cid.is_empty()
    {
        config.cid = cid;
    }
    Ok(config)
}

fn require_cid(config: &config::FeedConfig) -> Result<String, config::ConfigError> {
    if config.cid.is_empty() {
        return Err(config::ConfigError::Validation(
            "cid must be set (config file or CYLINDO_CID)".into(),
        ));
    }
    Ok(config.cid.clone())
}
