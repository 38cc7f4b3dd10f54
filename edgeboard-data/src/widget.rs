//! Widget state container.
//!
//! A [`WidgetState`] owns one widget's record snapshot and lifecycle. It is
//! shared (`Arc<WidgetState>`) between the code rendering views and the
//! [`AutoRefresh`](crate::refresh::AutoRefresh) task.
//!
//! # Overlapping refreshes
//!
//! Each call to [`WidgetState::refresh`] takes a ticket from a monotonically
//! increasing counter before it fetches. When the fetch completes, its result
//! is applied only if the ticket is newer than the last applied one. A slow
//! response that returns after a faster, later one is discarded as stale, so
//! the most recently *issued* refresh always wins.

use crate::source::RecordSource;
use chrono::{DateTime, Utc};
use edgeboard_export::{ExportArtifact, ExportError, ExportField, ExportOptions, Exporter};
use edgeboard_pipeline::{Facet, Page, PageRequest, Query, Record, Summary};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info, warn};

/// Lifecycle status of a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetStatus {
    /// Not mounted; refresh results are discarded.
    #[default]
    Unmounted,
    /// Mounted, first snapshot not yet received.
    Loading,
    Ready,
    /// The last fetch failed. The previous snapshot, if any, is still served.
    Unavailable { reason: String },
}

impl WidgetStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, WidgetStatus::Ready)
    }
}

/// What happened to a single refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced.
    Applied { records: usize },
    /// The fetch failed and the widget is now [`WidgetStatus::Unavailable`].
    Failed { reason: String },
    /// A newer refresh had already been applied.
    Stale,
    /// The widget was not mounted when the refresh started or completed.
    Discarded,
}

#[derive(Debug, Default)]
struct Inner {
    status: WidgetStatus,
    snapshot: Arc<Vec<Record>>,
    updated_at: Option<DateTime<Utc>>,
    /// Incremented on every mount; refreshes started under an older mount are dropped.
    mount_generation: u64,
    applied_ticket: u64,
}

/// State of a single dashboard widget.
pub struct WidgetState {
    name: SmolStr,
    source: Arc<dyn RecordSource>,
    next_ticket: AtomicU64,
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetState")
            .field("name", &self.name)
            .field("source", &self.source.name())
            .field("status", &self.inner.read().status)
            .finish()
    }
}

impl WidgetState {
    pub fn new(name: impl Into<SmolStr>, source: Arc<dyn RecordSource>) -> Self {
        Self {
            name: name.into(),
            source,
            next_ticket: AtomicU64::new(0),
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mount the widget and load its first snapshot.
    ///
    /// Mounting an already mounted widget only refreshes it.
    pub async fn mount(&self) -> RefreshOutcome {
        {
            let mut inner = self.inner.write();
            if inner.status == WidgetStatus::Unmounted {
                inner.mount_generation += 1;
                inner.status = WidgetStatus::Loading;
                info!(widget = %self.name, source = self.source.name(), "Widget mounted");
            }
        }
        self.refresh().await
    }

    /// Unmount the widget, dropping its snapshot.
    ///
    /// Refreshes still in flight are discarded when they complete.
    pub fn unmount(&self) {
        let mut inner = self.inner.write();
        if inner.status == WidgetStatus::Unmounted {
            return;
        }
        inner.status = WidgetStatus::Unmounted;
        inner.snapshot = Arc::default();
        inner.updated_at = None;
        info!(widget = %self.name, "Widget unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.read().status != WidgetStatus::Unmounted
    }

    /// Fetch a new snapshot from the source and replace the current one.
    ///
    /// A failed fetch marks the widget [`WidgetStatus::Unavailable`] but keeps
    /// serving the last good snapshot.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let generation = {
            let inner = self.inner.read();
            if inner.status == WidgetStatus::Unmounted {
                debug!(widget = %self.name, ticket, "Refresh skipped, widget unmounted");
                return RefreshOutcome::Discarded;
            }
            inner.mount_generation
        };

        debug!(widget = %self.name, ticket, "Refresh started");
        let result = self.source.fetch().await;

        let mut inner = self.inner.write();
        if inner.status == WidgetStatus::Unmounted || inner.mount_generation != generation {
            debug!(widget = %self.name, ticket, "Refresh discarded, widget unmounted");
            return RefreshOutcome::Discarded;
        }
        if ticket <= inner.applied_ticket {
            debug!(
                widget = %self.name,
                ticket,
                applied = inner.applied_ticket,
                "Stale refresh discarded"
            );
            return RefreshOutcome::Stale;
        }
        inner.applied_ticket = ticket;

        match result {
            Ok(records) => {
                let count = records.len();
                inner.snapshot = Arc::new(records);
                inner.status = WidgetStatus::Ready;
                inner.updated_at = Some(Utc::now());
                info!(widget = %self.name, ticket, records = count, "Refresh applied");
                RefreshOutcome::Applied { records: count }
            }
            Err(error) => {
                let reason = error.to_string();
                warn!(widget = %self.name, ticket, %error, "Refresh failed");
                inner.status = WidgetStatus::Unavailable {
                    reason: reason.clone(),
                };
                RefreshOutcome::Failed { reason }
            }
        }
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.read().status.clone()
    }

    /// Time the current snapshot was applied.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().updated_at
    }

    /// The current snapshot. Cheap to clone and never mutated in place.
    pub fn snapshot(&self) -> Arc<Vec<Record>> {
        Arc::clone(&self.inner.read().snapshot)
    }

    /// Run `query` over a consistent snapshot.
    pub fn view(&self, query: &Query) -> WidgetView {
        let (snapshot, status, updated_at) = {
            let inner = self.inner.read();
            (Arc::clone(&inner.snapshot), inner.status.clone(), inner.updated_at)
        };

        let output = query.run(&snapshot);
        WidgetView {
            records: output.to_owned_records(),
            summary: output.summary,
            facets: output.facets,
            total_count: output.total_count,
            filtered_count: output.filtered_count,
            page: output.page,
            status,
            updated_at,
        }
    }

    /// Export every record matching `query`, in query order and ignoring its page.
    pub fn export(
        &self,
        query: &Query,
        available: &[ExportField],
        options: &ExportOptions,
        exporter: &Exporter,
    ) -> Result<ExportArtifact, ExportError> {
        let snapshot = self.snapshot();
        let query = query.clone().page(PageRequest::all());
        let output = query.run(&snapshot);
        exporter.export(output.records, available, options)
    }
}

/// An owned, rendered view of a widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    /// The requested page of filtered, sorted records
    pub records: Vec<Record>,
    /// Summary over the whole filtered set
    pub summary: Summary,
    pub facets: Vec<Facet>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub page: Page,
    pub status: WidgetStatus,
    pub updated_at: Option<DateTime<Utc>>,
}
