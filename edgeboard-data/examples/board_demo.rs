//! Example: run an offline arbitrage board end to end.
//!
//! This example demonstrates the full workflow:
//! 1. Mount an arbitrage widget over a static snapshot
//! 2. Start the auto-refresh task
//! 3. Filter, sort and summarise with the widget's default query
//! 4. Export the filtered rows as CSV
//!
//! Usage:
//!   cargo run -p edgeboard-data --example board_demo
//!
//! Optional environment variables:
//!   EDGEBOARD_REFRESH_SECS=2   # Refresh period (default: 30)
//!   EDGEBOARD_PAGE_SIZE=2      # Rows per page (default: 100)
//!   EXPORT_DIR=./exports       # Write the CSV here instead of printing it

use chrono::{Duration as ChronoDuration, Utc};
use edgeboard_data::{
    ArbitrageOpportunity, AutoRefresh, BoardConfig, StaticSource, WidgetKind, WidgetState,
    into_records,
};
use edgeboard_export::{ExportFormat, ExportOptions, Exporter};
use edgeboard_pipeline::{FieldConstraint, PageRequest};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging();

    let config = BoardConfig::from_env();
    if let Err(e) = config.validate() {
        error!("Invalid board configuration: {}", e);
        return;
    }
    info!(?config, "Board configuration");

    // Step 1: mount the widget
    let source = Arc::new(StaticSource::new("offline", into_records(opportunities())));
    let widget = Arc::new(WidgetState::new(
        WidgetKind::ArbitrageScanner.to_string(),
        source.clone(),
    ));
    let outcome = widget.mount().await;
    info!(?outcome, "Initial load");

    // Step 2: refresh in the background, picking up a changed snapshot
    let refresher = AutoRefresh::spawn(Arc::clone(&widget), config.refresh_interval());
    let mut updated = opportunities();
    updated.retain(|opportunity| opportunity.sport != "NHL");
    source.replace(into_records(updated));

    // Step 3: profitable opportunities, best ROI first
    let query = WidgetKind::ArbitrageScanner
        .default_query()
        .filter("roi", FieldConstraint::at_least(1.0))
        .page(PageRequest::page(1, config.page_size));
    let view = widget.view(&query);

    info!(
        matched = view.filtered_count,
        of = view.total_count,
        total_profit = view.summary.sum,
        best_profit = view.summary.max,
        pages = view.page.total_pages(),
        "Arbitrage view"
    );
    for record in &view.records {
        info!(
            id = %record.id,
            sport = record.text("sport").unwrap_or("-"),
            roi = record.number("roi").unwrap_or_default(),
            "Opportunity"
        );
    }
    for facet in &view.facets {
        info!(field = %facet.field, counts = ?facet.counts, "Facet");
    }

    // Step 4: export every matching row
    let options = ExportOptions {
        filename: Some("arbitrage_opportunities".into()),
        ..ExportOptions::new(ExportFormat::Csv, ["sport", "event", "roi", "profit", "expires_at"])
    };
    let artifact = match widget.export(
        &query,
        &WidgetKind::ArbitrageScanner.export_fields(),
        &options,
        &Exporter::new(),
    ) {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Export failed: {}", e);
            return;
        }
    };

    match std::env::var("EXPORT_DIR") {
        Ok(dir) => match artifact.write_to(&dir) {
            Ok(path) => info!(?path, "Export written"),
            Err(e) => error!("Failed to write export: {}", e),
        },
        Err(_) => println!("{}", artifact.body),
    }

    let refreshes = refresher.stop().await;
    widget.unmount();
    info!(refreshes, "Board closed");
}

fn opportunities() -> Vec<ArbitrageOpportunity> {
    let now = Utc::now();
    let opportunity = |id: &str, sport: &str, event: &str, roi: f64, stake: f64| {
        ArbitrageOpportunity {
            id: id.into(),
            sport: sport.into(),
            event: event.into(),
            market_type: "moneyline".into(),
            sportsbooks: vec!["DraftKings".into(), "FanDuel".into()],
            roi,
            profit: stake * roi / 100.0,
            total_stake: stake,
            confidence: 0.85,
            expires_at: Some(now + ChronoDuration::minutes(20)),
        }
    };

    vec![
        opportunity("arb-1", "MLB", "Yankees @ Red Sox", 2.4, 1_000.0),
        opportunity("arb-2", "NBA", "Lakers @ Celtics", 0.6, 2_500.0),
        opportunity("arb-3", "NFL", "Bills @ Jets", 1.8, 1_500.0),
        opportunity("arb-4", "NHL", "Rangers @ Bruins", 3.1, 500.0),
        opportunity("arb-5", "MLB", "Cubs @ Cardinals", 1.1, 2_000.0),
    ]
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init()
}
