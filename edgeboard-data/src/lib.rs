//! Widget state and data plumbing for the edgeboard dashboard.
//!
//! Wraps the synchronous record pipeline in the state a live dashboard needs:
//!
//! ```text
//! RecordSource ─fetch─▶ WidgetState (snapshot, status) ─view(Query)─▶ WidgetView
//!                            ▲                        └─export────▶ ExportArtifact
//!                            └── AutoRefresh (tokio interval)
//! ```
//!
//! # Key Components
//!
//! - [`RecordSource`]: async snapshot provider ([`StaticSource`], [`HttpSource`])
//! - [`WidgetState`]: explicit mount/unmount lifecycle, wholesale snapshot
//!   replacement, last-request-wins refresh ordering
//! - [`AutoRefresh`]: background task refreshing a widget on a fixed period
//! - [`rows`]: typed dashboard rows and per-widget query presets
//! - [`BoardConfig`]: refresh period, page size and feed location
//!
//! # Example
//!
//! ```rust,no_run
//! use edgeboard_data::{AutoRefresh, BoardConfig, HttpSource, WidgetKind, WidgetState};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::from_env();
//! let widget = Arc::new(WidgetState::new(
//!     "arbitrage",
//!     Arc::new(HttpSource::from_config(&config)?),
//! ));
//!
//! widget.mount().await;
//! let refresher = AutoRefresh::spawn(Arc::clone(&widget), config.refresh_interval());
//!
//! let view = widget.view(&WidgetKind::ArbitrageScanner.default_query());
//! println!("{} opportunities, {:.2} total profit", view.filtered_count, view.summary.sum);
//!
//! refresher.stop().await;
//! widget.unmount();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod refresh;
pub mod rows;
pub mod source;
pub mod widget;

// Re-exports for convenience
pub use config::BoardConfig;
pub use error::SourceError;
pub use refresh::AutoRefresh;
pub use rows::{
    ArbitrageOpportunity, BettingRule, FeatureContribution, IntoRecord, ModelMetric, Prediction,
    WidgetKind, into_records,
};
pub use source::{HttpSource, RecordSource, StaticSource};
pub use widget::{RefreshOutcome, WidgetState, WidgetStatus, WidgetView};
