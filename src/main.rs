// src/main.rs
//
// Woodworks console
//
//   woodworks catalog [page]     first (or given) catalog page
//   woodworks analytics          admin counters
//   woodworks import <manifest>  bulk product import

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};

use woodworks::{
    AppState, HttpCatalogClient, ListingFilter, ListingPhase, StorefrontConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    // 1. CONFIGURATION
    let config = StorefrontConfig::load().context("loading configuration")?;
    log::info!("using catalog at {}", config.backend_url);

    // 2. CONNECTION
    let client = HttpCatalogClient::from_config(&config)?;
    let state = AppState::new(config);
    state.connect(Arc::new(client), None);

    // 3. COMMAND
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("catalog") => {
            let page = match args.get(1) {
                Some(page) => page.parse().context("page must be a number")?,
                None => 0,
            };
            show_catalog(&state, page).await
        }
        Some("analytics") => show_analytics(&state).await,
        Some("import") => {
            let Some(manifest) = args.get(1) else {
                bail!("usage: woodworks import <manifest.json>");
            };
            import(&state, PathBuf::from(manifest)).await
        }
        Some(other) => bail!("unknown command {:?} (catalog | analytics | import)", other),
    }
}

async fn show_catalog(state: &AppState, page: u64) -> anyhow::Result<()> {
    let listing = state.listing(ListingFilter::All);
    listing.reset().await;
    for _ in 0..page {
        if !listing.load_more().await {
            break;
        }
    }

    let snapshot = listing.snapshot();
    match (snapshot.phase, snapshot.error.clone()) {
        (ListingPhase::NotReady, _) => bail!("catalog service is not connected"),
        (ListingPhase::Error, Some(error)) => return Err(error).context("fetching catalog"),
        _ => {}
    }

    let start = (page * listing.page_size()) as usize;
    for product in snapshot.products.iter().skip(start) {
        println!("{:<28} {:<18} {}", product.id, product.category, product.name);
    }
    println!(
        "{} of {} products{}",
        snapshot.products.len(),
        snapshot.total,
        if snapshot.has_more() { " (more available)" } else { "" }
    );
    Ok(())
}

async fn show_analytics(state: &AppState) -> anyhow::Result<()> {
    let summary = state
        .catalog_service
        .analytics_summary()
        .await
        .into_result()
        .context("fetching analytics")?;

    println!("products:        {} ({} active, {} inactive)",
        summary.total_products, summary.active_products, summary.inactive_products);
    println!("contact forms:   {}", summary.total_contact_submissions);
    println!("customizations:  {}", summary.total_customization_requests);
    for (category, products) in &summary.products_by_category {
        println!("  {:<24} {}", category, products.len());
    }
    Ok(())
}

async fn import(state: &AppState, manifest: PathBuf) -> anyhow::Result<()> {
    let report = state
        .bulk_import_service
        .import_manifest(&manifest, |progress| {
            log::info!(
                "[{:>3}%] {} ({}/{})",
                progress.percent(),
                progress.current,
                progress.completed,
                progress.total
            );
        })
        .await?;

    println!("imported {} products", report.imported.len());
    for failure in &report.failures {
        println!("failed: {}", failure);
    }
    for rejection in &report.image_rejections {
        println!("skipped image {}: {}", rejection.name, rejection.error);
    }
    Ok(())
}
