use std::path::{Path, PathBuf};

use anyhow::Context;
use brokerdb_core::{Catalog, ImportConfig};
use brokerdb_import::{preview_import, run_import};
use brokerdb_store::PostgrestStore;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brokerdb-cli")]
#[command(about = "Import the broker catalog into the hosted store")]
struct Cli {
    /// Store project URL, e.g. `https://abc.supabase.co`
    #[arg(value_name = "STORE_URL", env = "SUPABASE_URL")]
    store_url: Option<String>,

    /// Service-role key, sent as `apikey` and bearer token
    #[arg(
        value_name = "ACCESS_KEY",
        env = "SUPABASE_SERVICE_ROLE_KEY",
        hide_env_values = true
    )]
    access_key: Option<String>,

    /// Catalog YAML to import instead of the built-in one
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Validate the catalog and print what would be linked; no store calls
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Both store credentials, if present and non-blank.
    fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.store_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let key = self.access_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((url, key))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if !cli.dry_run && cli.credentials().is_none() {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!(
            "error: STORE_URL and ACCESS_KEY are required \
             (or set SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY)"
        );
        std::process::exit(1);
    }

    let config = brokerdb_core::load_import_config()?;
    tracing::subscriber::set_global_default(log_subscriber(&config.log_level)?)?;

    let catalog = resolve_catalog(cli.catalog.as_deref(), &config)?;

    if cli.dry_run {
        print_preview(&catalog);
        return Ok(());
    }

    let Some((store_url, access_key)) = cli.credentials() else {
        anyhow::bail!("store credentials missing");
    };
    let store = PostgrestStore::new(
        store_url,
        access_key,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build store client")?;
    tracing::info!(store = %store.rest_root(), "starting broker import");

    let summary = run_import(&store, &catalog).await?;

    println!("{summary}");
    println!("imported {} new brokers", summary.brokers_imported);
    Ok(())
}

/// Log lines go to stderr so stdout carries only the summary or preview.
/// `RUST_LOG` wins over `log_level` when set.
fn log_subscriber(log_level: &str) -> anyhow::Result<impl tracing::Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish())
}

/// Catalog source precedence: `--catalog`, then `BROKERDB_CATALOG_PATH`,
/// then the built-in catalog.
fn resolve_catalog(flag: Option<&Path>, config: &ImportConfig) -> anyhow::Result<Catalog> {
    match flag.or(config.catalog_path.as_deref()) {
        Some(path) => brokerdb_core::load_catalog(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => brokerdb_core::builtin_catalog().context("built-in catalog is invalid"),
    }
}

fn print_preview(catalog: &Catalog) {
    let previews = preview_import(catalog);
    println!(
        "dry-run: would import {} brokers against {} categories",
        previews.len(),
        catalog.categories.len()
    );
    for preview in &previews {
        println!("  {}: [{}]", preview.name, preview.categories.join(", "));
        if !preview.unmatched_keywords.is_empty() {
            println!(
                "    unmatched keywords: [{}]",
                preview.unmatched_keywords.join(", ")
            );
        }
    }
}
