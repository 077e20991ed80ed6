use anyhow::Context as _;
use clap::Parser;
use premium_facts::logger::{self, LogLevel};
use premium_facts::{Config, ProductCatalog, Skill, StaticProductCatalog, config};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Parser, Debug)]
#[command(
    name = "premium-facts",
    about = "Answer one voice request envelope with a response envelope"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve products from this JSON file instead of the monetization service
    #[arg(long)]
    catalog_file: Option<PathBuf>,

    /// Logging verbosity when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Request envelope to read; stdin when omitted
    input: Option<PathBuf>,
}

async fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::try_init(cli.log_level).map_err(|e| anyhow::anyhow!(e))?;

    let config = match &cli.config {
        Some(path) => config::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let catalog: Option<Arc<dyn ProductCatalog>> = match &cli.catalog_file {
        Some(path) => Some(Arc::new(
            StaticProductCatalog::load(path)
                .await
                .context("loading catalog file")?,
        )),
        None => None,
    };
    let skill = Skill::from_config(&config, catalog)
        .await
        .context("assembling skill")?;

    let request = read_input(cli.input.as_ref()).await?;
    let response = skill
        .handle_envelope(&request)
        .await
        .context("decoding request envelope")?;

    let mut out = serde_json::to_string_pretty(&response)?;
    out.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
