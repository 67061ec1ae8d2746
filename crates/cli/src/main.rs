use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use wlpv_sources::{fetch_all, Catalog, RawDocument, SourceFetcher};
use wlpv_store::aggregate;

use crate::args::Cli;

mod additions;
mod args;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_normalized();

    if cli.version {
        println!("wlpv version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let user = additions::load(&cli.add)?;

    let (system, order) = if cli.no_system {
        if user.is_empty() {
            bail!("no protocols to display");
        }
        (HashMap::new(), Vec::new())
    } else {
        let catalog = select_catalog(&cli)?;
        let documents = fetch_system(&catalog).await?;
        (documents, catalog.namespaces())
    };

    let merged = aggregate(system, user);
    log::info!(
        "{} protocols ready, {} shadowed by --add",
        merged.protocol_count(),
        merged.warnings.len()
    );
    let store = merged.into_store(&order);

    let open = cli.protocol;
    tokio::task::spawn_blocking(move || wlpv_viewer::run(&store, open.as_deref()))
        .await
        .context("viewer task panicked")?
        .context("terminal session failed")?;

    Ok(())
}

fn select_catalog(cli: &Cli) -> Result<Catalog> {
    if let Some(path) = &cli.catalog {
        return Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()));
    }
    Ok(if cli.offline {
        Catalog::offline()
    } else {
        Catalog::online()
    })
}

async fn fetch_system(catalog: &Catalog) -> Result<HashMap<String, Vec<RawDocument>>> {
    let fetcher = Arc::new(SourceFetcher::new().context("failed to set up fetching")?);
    let outcome = fetch_all(fetcher, catalog)
        .await
        .context("fetch failed or returned no results")?;

    if outcome.is_empty() {
        bail!("fetch failed or returned no results");
    }
    Ok(outcome.documents)
}
